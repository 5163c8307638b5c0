//! `berth flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use berth::ops::module_flags;
use berth::util::GlobalContext;

pub fn execute(args: FlagsArgs, gctx: &GlobalContext) -> Result<()> {
    let tasks = module_flags(gctx, &args.module, args.kind)?;

    if let Some(first) = tasks.first() {
        println!(
            "# `{}` via convention `{}` (revision {}), toolchain {}",
            args.module,
            first.convention(),
            first.revision(),
            first.toolchain()
        );
    }

    for task in &tasks {
        println!("{}: {}", task.kind(), task.command_args().join(" "));
        if gctx.is_verbose() {
            for dep in task.test_dependencies() {
                println!("  test dependency: {}", dep);
            }
            if let Some(engine) = task.test_engine() {
                println!("  test engine: {}", engine);
            }
        }
    }

    Ok(())
}
