//! `berth plan` command

use anyhow::Result;

use crate::cli::PlanArgs;
use berth::ops::{plan, PlanOptions};
use berth::util::GlobalContext;

pub fn execute(args: PlanArgs, gctx: &GlobalContext) -> Result<()> {
    let opts = PlanOptions {
        output: args.output,
    };
    let plan = plan(gctx, &opts)?;

    if args.json {
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    for (id, module) in plan.modules() {
        println!(
            "{} -> {} [{}]",
            id,
            module.binding().convention,
            module.fingerprint()
        );
        if !module.features().is_empty() {
            let features: Vec<&str> = module.features().iter().map(|f| f.as_str()).collect();
            println!("    features: {}", features.join(", "));
        }
        for task in module.tasks().values() {
            println!("    {}: {}", task.kind(), task.command_args().join(" "));
        }
    }

    Ok(())
}
