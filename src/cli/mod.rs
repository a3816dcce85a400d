//! CLI subcommand implementations for the pagemirror binary.

pub mod clone_cmd;
pub mod deploy_cmd;
pub mod doctor;
