//! `berth conventions` command

use anyhow::Result;

use crate::cli::ConventionsArgs;
use berth::core::ConventionDefinition;
use berth::ops::Project;
use berth::util::GlobalContext;

pub fn execute(args: ConventionsArgs, gctx: &GlobalContext) -> Result<()> {
    let project = Project::load(gctx)?;
    let registry = project.manifest.populate_registry()?;

    if registry.is_empty() {
        println!("No conventions declared in {}", project.manifest_path.display());
        return Ok(());
    }

    for def in registry.iter() {
        print_definition(def);

        if args.all_revisions {
            for rev in registry.revisions(def.id()) {
                if rev == def.revision() {
                    continue;
                }
                let old = registry.resolve_revision(def.id(), rev)?;
                println!(
                    "    superseded revision {}: language {}, args [{}]",
                    rev,
                    old.language_version(),
                    old.compiler_args()
                );
            }
        }
    }

    Ok(())
}

fn print_definition(def: &ConventionDefinition) {
    println!(
        "{} (revision {}, language {})",
        def.id(),
        def.revision(),
        def.language_version()
    );
    if !def.compiler_args().is_empty() {
        println!("    args: {}", def.compiler_args());
    }
    for feature in def.features() {
        let state = if feature.default { "on" } else { "off" };
        println!("    feature {} [{}]: {}", feature.name, state, feature.flags);
    }
    if let Some(engine) = def.test_engine() {
        println!("    test engine: {}", engine);
    }
    for dep in def.test_dependencies() {
        println!("    test dependency: {}", dep);
    }
}
