use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canvas::Canvas;
use crate::error::DocumentError;

pub const DEFAULT_TITLE: &str = "Insert title";
pub const NOTES_EXTENSION: &str = ".notes";
const NEW_NAME_PREFIX: &str = "new_notes_";

/// Identifier of a block, unique within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    Title(String),
    Text(String),
    Drawing(Canvas),
}

impl BlockKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Title(_) => "title",
            BlockKind::Text(_) => "text",
            BlockKind::Drawing(_) => "drawing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    kind: BlockKind,
    #[serde(skip)]
    editing: bool,
}

impl Block {
    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut BlockKind {
        &mut self.kind
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }
}

/// A note: a title block followed by text and drawing blocks.
///
/// At most one block is being edited at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    name: String,
    blocks: Vec<Block>,
    next_block_id: usize,
    #[serde(skip)]
    saved: bool,
    #[serde(skip)]
    last_saved: Option<u64>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Fresh document holding only the placeholder title, under a generated name
    pub fn new() -> Self {
        let suffix = 100_000 + (Uuid::new_v4().as_u128() % 900_000) as u32;
        let mut doc = Self {
            name: format!("{NEW_NAME_PREFIX}{suffix}{NOTES_EXTENSION}"),
            blocks: Vec::new(),
            next_block_id: 0,
            saved: false,
            last_saved: None,
        };
        let id = doc.allocate_id();
        doc.blocks.push(Block {
            id,
            kind: BlockKind::Title(DEFAULT_TITLE.to_string()),
            editing: false,
        });
        doc
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.saved = false;
    }

    /// Whether the name is still the generated placeholder
    pub fn name_is_new(&self) -> bool {
        let Some(rest) = self.name.strip_prefix(NEW_NAME_PREFIX) else {
            return false;
        };
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        digits > 0 && rest[digits..].starts_with(NOTES_EXTENSION)
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn last_saved(&self) -> Option<u64> {
        self.last_saved
    }

    pub fn mark_saved(&mut self, at: u64) {
        self.saved = true;
        self.last_saved = Some(at);
    }

    pub fn mark_unsaved(&mut self) {
        self.saved = false;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    /// Inserts a block at `index`, or at the end when `None`.
    ///
    /// The title stays first, so `index` must be at least 1.
    pub fn add_block(&mut self, index: Option<usize>, kind: BlockKind) -> Result<BlockId, DocumentError> {
        let len = self.blocks.len();
        let index = index.unwrap_or(len);
        if index == 0 || index > len {
            return Err(DocumentError::IndexOutOfRange { index, len });
        }

        let id = self.allocate_id();
        self.blocks.insert(
            index,
            Block {
                id,
                kind,
                editing: false,
            },
        );
        self.saved = false;
        log::debug!("Added block {} at {}", id, index);
        Ok(id)
    }

    pub fn delete_block(&mut self, id: BlockId) -> Result<Block, DocumentError> {
        let index = self.position(id).ok_or(DocumentError::BlockNotFound(id))?;
        self.saved = false;
        Ok(self.blocks.remove(index))
    }

    /// Makes `id` the only block in editing mode
    pub fn activate_editing(&mut self, id: BlockId) -> Result<(), DocumentError> {
        let index = self.position(id).ok_or(DocumentError::BlockNotFound(id))?;
        self.collapse_editing();
        self.blocks[index].editing = true;
        self.saved = false;
        Ok(())
    }

    pub fn save_edits(&mut self, id: BlockId) -> Result<(), DocumentError> {
        let block = self.block_mut(id).ok_or(DocumentError::BlockNotFound(id))?;
        block.editing = false;
        Ok(())
    }

    pub fn collapse_editing(&mut self) {
        for block in &mut self.blocks {
            block.editing = false;
        }
    }

    pub fn editing_block(&self) -> Option<BlockId> {
        self.blocks.iter().find(|block| block.editing).map(Block::id)
    }

    pub fn title(&self) -> Result<&str, DocumentError> {
        match self.blocks.first().map(Block::kind) {
            Some(BlockKind::Title(title)) => Ok(title),
            _ => Err(DocumentError::MissingTitle),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DocumentError> {
        match self.blocks.first_mut().map(Block::kind_mut) {
            Some(BlockKind::Title(current)) => {
                *current = title.into();
                self.saved = false;
                Ok(())
            }
            _ => Err(DocumentError::MissingTitle),
        }
    }

    /// Content blocks in order, without the title
    pub fn printable(&self) -> Vec<&BlockKind> {
        self.blocks
            .iter()
            .map(Block::kind)
            .filter(|kind| !matches!(kind, BlockKind::Title(_)))
            .collect()
    }
}
