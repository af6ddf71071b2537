//! Agent runtime integrations.

pub mod claude_code;

pub use claude_code::ClaudeCodeRuntime;
