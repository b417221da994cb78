use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// A node of the dashboard tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DashboardNode {
    /// A board owning its nested boards and clips.
    Board(Board),
    /// A leaf clip.
    Clip(Clip),
}

/// Board metadata and owned children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Identifier of the board.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Tab the board is shown in.
    #[serde(default)]
    pub tab_id: Option<ItemId>,
    /// Nested boards and clips in display order.
    #[serde(default)]
    pub children: Vec<DashboardNode>,
}

/// Clip metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Identifier of the clip.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Stored payload.
    #[serde(default)]
    pub value: Option<String>,
    /// Free-form note shown next to the clip.
    #[serde(default)]
    pub description: Option<String>,
    /// Raw per-item options JSON.
    #[serde(default)]
    pub item_options: Option<String>,
}

impl DashboardNode {
    /// Identifier of the node.
    #[must_use]
    pub const fn id(&self) -> &ItemId {
        match self {
            Self::Board(board) => &board.id,
            Self::Clip(clip) => &clip.id,
        }
    }

    /// Children of the node; clips have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Board(board) => &board.children,
            Self::Clip(_) => &[],
        }
    }

    /// Board payload when the node is a board.
    #[must_use]
    pub const fn as_board(&self) -> Option<&Board> {
        match self {
            Self::Board(board) => Some(board),
            Self::Clip(_) => None,
        }
    }

    /// Ids of every node nested below this one, depth-first pre-order.
    #[must_use]
    pub fn descendant_ids(&self) -> Vec<ItemId> {
        let mut ids = Vec::new();
        Self::collect_ids_into(self.children(), &mut ids);
        ids
    }

    fn collect_ids_into(nodes: &[Self], ids: &mut Vec<ItemId>) {
        for node in nodes {
            ids.push(node.id().clone());
            Self::collect_ids_into(node.children(), ids);
        }
    }
}

/// Depth-first search returning the first node accepted by `predicate`.
pub fn find_node<'a, P>(nodes: &'a [DashboardNode], predicate: &P) -> Option<&'a DashboardNode>
where
    P: Fn(&DashboardNode) -> bool,
{
    for node in nodes {
        if predicate(node) {
            return Some(node);
        }
        if let Some(found) = find_node(node.children(), predicate) {
            return Some(found);
        }
    }
    None
}

/// Find a board anywhere in the tree by id. Clips with the same id are skipped.
#[must_use]
pub fn find_board_by_id<'a>(tree: &'a [DashboardNode], id: Option<&ItemId>) -> Option<&'a Board> {
    let id = id?;
    find_node(tree, &|node: &DashboardNode| node.as_board().is_some_and(|board| &board.id == id))
        .and_then(DashboardNode::as_board)
}
