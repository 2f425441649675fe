//! Control Flow Manager
//!
//! Tracks the structured frames enclosing the instruction currently being lowered so
//! named break targets can be turned into the relative depths WASM branches use.
//! Both blocks and the bodies of ifs open a frame; only blocks carry a label.

use crate::backends::wasm::error::WasmGenerationError;

/// The kind of control flow frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A labelled block (br jumps to its end)
    Block,
    /// The then/else bodies of an if
    If,
}

#[derive(Debug, Clone)]
pub struct BlockInfo {
    pub kind: BlockKind,
    /// Label a break can name, None for if frames
    pub label: Option<String>,
    /// The nesting depth (0 = outermost)
    pub depth: u32,
}

#[derive(Debug, Default)]
pub struct ControlFlowManager {
    /// Stack of currently open frames (innermost at the end)
    block_stack: Vec<BlockInfo>,
}

impl ControlFlowManager {
    pub fn new() -> Self {
        ControlFlowManager {
            block_stack: Vec::new(),
        }
    }

    pub fn enter_block(&mut self, label: &str) {
        self.push(BlockKind::Block, Some(label.to_owned()));
    }

    pub fn enter_if(&mut self) {
        self.push(BlockKind::If, None);
    }

    fn push(&mut self, kind: BlockKind, label: Option<String>) {
        let depth = self.current_depth();
        self.block_stack.push(BlockInfo { kind, label, depth });
    }

    /// Close the innermost frame.
    /// Enter and exit calls are paired by the lowerer, so an empty stack is a bug there.
    pub fn exit_block(&mut self) -> Result<BlockInfo, WasmGenerationError> {
        self.block_stack.pop().ok_or_else(|| {
            WasmGenerationError::unreachable("attempted to exit a block when no blocks are active")
        })
    }

    /// Get the current nesting depth (number of open frames)
    pub fn current_depth(&self) -> u32 {
        self.block_stack.len() as u32
    }

    pub fn current_block(&self) -> Option<&BlockInfo> {
        self.block_stack.last()
    }

    /// Resolve a break label to its relative branch depth.
    /// The innermost block with a matching label wins, so inner labels shadow outer ones.
    pub fn resolve_label(&self, label: &str) -> Result<u32, WasmGenerationError> {
        self.block_stack
            .iter()
            .rev()
            .position(|block| block.label.as_deref() == Some(label))
            .map(|relative| relative as u32)
            .ok_or_else(|| {
                WasmGenerationError::not_found(
                    label,
                    format!("the {} enclosing block(s) of a break", self.current_depth()),
                )
            })
    }

    pub fn is_balanced(&self) -> bool {
        self.block_stack.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/control_flow_tests.rs"]
mod tests;
