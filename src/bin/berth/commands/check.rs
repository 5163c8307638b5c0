//! `berth check` command

use anyhow::{bail, Result};

use berth::ops::check;
use berth::util::diagnostic::Diagnostic;
use berth::util::GlobalContext;

pub fn execute(gctx: &GlobalContext) -> Result<()> {
    let report = check(gctx)?;

    for module in &report.modules {
        match module.result {
            Ok(ref fingerprint) => {
                println!("ok      {} ({}) [{}]", module.module, module.convention, fingerprint)
            }
            Err(ref e) => {
                println!("FAILED  {} ({})", module.module, module.convention);
                eprint!("{}", e.to_diagnostic().format(gctx.color()));
            }
        }
        for name in &module.unknown_features {
            let warning = Diagnostic::warning(format!(
                "module `{}` toggles unknown feature `{}`",
                module.module, name
            ))
            .with_location(&report.manifest_path)
            .with_context(format!("convention `{}` does not define it", module.convention));
            eprint!("{}", warning.format(gctx.color()));
        }
    }

    if !report.passed() {
        bail!(
            "{} of {} module(s) failed to configure",
            report.failures(),
            report.modules.len()
        );
    }

    println!(
        "{} convention(s), {} module(s) configured",
        report.conventions,
        report.modules.len()
    );
    Ok(())
}
