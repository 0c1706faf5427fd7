pub(crate) mod args;
pub(crate) mod commands;

pub(crate) use args::{Cli, ExportKind};
pub(crate) use commands::{Commands, GenerateArgs, Mode};
