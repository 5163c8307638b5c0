//! `berth toolchain` command

use anyhow::Result;

use crate::cli::{ToolchainArgs, ToolchainCommands};
use berth::builder::detect_selector;
use berth::core::LanguageVersion;
use berth::util::GlobalContext;

pub fn execute(args: ToolchainArgs, gctx: &GlobalContext) -> Result<()> {
    let root = gctx
        .find_project_root()
        .unwrap_or_else(|_| gctx.cwd().to_path_buf());
    let config = gctx.toolchain_config(&root)?;
    let mut selector = detect_selector(&config);

    match args.command {
        ToolchainCommands::Show(show) => {
            let version = LanguageVersion::new(show.version, "toolchain show")?;
            let toolchain = selector.select(version)?;
            println!("{}", toolchain);
        }
        ToolchainCommands::List => {
            let toolchains = selector.list();
            if toolchains.is_empty() {
                println!("No toolchains found");
            }
            for toolchain in toolchains {
                println!("{}", toolchain);
            }
        }
    }

    Ok(())
}
