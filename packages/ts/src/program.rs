use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::{Node, NodeRef, SourceFile};

/// Index of a source file inside a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("source file '{0}' is already part of the program")]
    DuplicateFileName(String),
    #[error("no source file with id {0:?} in the program")]
    UnknownFile(FileId),
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeRef),
}

/// A set of source files: the type-check shims plus the user files their
/// declarations point into.
#[derive(Debug, Clone, Default)]
pub struct Program {
    source_files: Vec<SourceFile>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source_file(&mut self, source_file: SourceFile) -> Result<FileId, ProgramError> {
        if self
            .source_files
            .iter()
            .any(|sf| sf.file_name() == source_file.file_name())
        {
            return Err(ProgramError::DuplicateFileName(
                source_file.file_name().to_string(),
            ));
        }
        let id = FileId(self.source_files.len() as u32);
        self.source_files.push(source_file);
        Ok(id)
    }

    pub fn get_source_file(&self, id: FileId) -> Result<&SourceFile, ProgramError> {
        self.source_files
            .get(id.0 as usize)
            .ok_or(ProgramError::UnknownFile(id))
    }

    pub fn get_source_file_by_name(&self, file_name: &str) -> Option<FileId> {
        self.source_files
            .iter()
            .position(|sf| sf.file_name() == file_name)
            .map(|index| FileId(index as u32))
    }

    pub fn get_node(&self, node: NodeRef) -> Result<Node<'_>, ProgramError> {
        let file = self.get_source_file(node.file)?;
        if !file.contains(node.node) {
            return Err(ProgramError::UnknownNode(node));
        }
        Ok(Node::new(node.file, file, node.node))
    }

    /// The `SourceFile` node of a file.
    pub fn get_root_node(&self, id: FileId) -> Result<Node<'_>, ProgramError> {
        let file = self.get_source_file(id)?;
        Ok(Node::new(id, file, file.root()))
    }
}
