//! 登出命令

use quill_common::SessionId;
use quill_cqrs_core::Command;

/// 登出命令
#[derive(Debug, Clone)]
pub struct LogoutCommand {
    pub session_id: SessionId,
}

impl Command for LogoutCommand {
    type Result = ();
}
