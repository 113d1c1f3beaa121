// tests/policy_properties.rs

use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;

use stylewatch::engine::{
    CompileOutcome, CoreCommand, CoreRuntime, RuntimeEvent, RuntimeOptions,
};
use stylewatch::types::{ChangeEvent, ChangeKind};
use stylewatch_test_utils::SettingsBuilder;

const FILES: [&str; 5] = ["main", "a", "b", "parts/c", "parts/d"];

fn path(i: usize) -> PathBuf {
    PathBuf::from(format!("/p/src/{}.less", FILES[i % FILES.len()]))
}

#[derive(Debug, Clone)]
enum Step {
    Change(ChangeKind, usize),
    /// Pretend a compile of file `.0` reported imports `.1`.
    Imports(usize, Vec<usize>),
}

fn kind_strategy() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Created),
        Just(ChangeKind::Modified),
        Just(ChangeKind::Removed),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (kind_strategy(), 0..FILES.len()).prop_map(|(k, i)| Step::Change(k, i)),
        (0..FILES.len(), proptest::collection::vec(0..FILES.len(), 0..4))
            .prop_map(|(i, deps)| Step::Imports(i, deps)),
    ]
}

/// Relative import reference from `/p/src/<FILES[from]>` to `FILES[to]`.
fn reference(from: usize, to: usize) -> String {
    let from_nested = FILES[from].starts_with("parts/");
    let target = FILES[to];
    if from_nested {
        format!("../{target}")
    } else {
        target.to_string()
    }
}

fn compiled_sources(commands: &[CoreCommand]) -> Vec<PathBuf> {
    commands
        .iter()
        .filter_map(|c| match c {
            CoreCommand::Compile(job) => Some(job.source.clone()),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn main_mode_compiles_exactly_the_main_file(steps in proptest::collection::vec(step_strategy(), 1..40)) {
        let settings = SettingsBuilder::new("/p/src", "/p/dist").main_file("main.less").build();
        let main = settings.main_file.clone().unwrap();
        let mut core = CoreRuntime::new(Arc::new(settings), RuntimeOptions::default());

        let initial = core.step(RuntimeEvent::ScanCompleted {
            files: (0..FILES.len()).map(path).collect(),
        });
        prop_assert_eq!(compiled_sources(&initial.commands), vec![main.clone()]);

        for step in steps {
            match step {
                Step::Change(kind, i) => {
                    let out = core.step(RuntimeEvent::FileChanged(ChangeEvent::new(kind, path(i))));
                    let compiled = compiled_sources(&out.commands);
                    if kind == ChangeKind::Removed {
                        prop_assert!(compiled.is_empty());
                    } else {
                        prop_assert_eq!(compiled, vec![main.clone()]);
                    }
                    prop_assert!(out.keep_running);
                }
                Step::Imports(i, deps) => {
                    let imports = deps.iter().map(|&d| reference(i, d)).collect();
                    core.step(RuntimeEvent::CompileFinished {
                        source: path(i),
                        outcome: CompileOutcome::Success { imports },
                    });
                }
            }
        }
    }

    #[test]
    fn multi_mode_compiles_importers_or_the_file_itself(steps in proptest::collection::vec(step_strategy(), 1..40)) {
        let settings = SettingsBuilder::new("/p/src", "/p/dist").build();
        let mut core = CoreRuntime::new(Arc::new(settings), RuntimeOptions::default());

        for step in steps {
            match step {
                Step::Change(kind, i) => {
                    let changed = path(i);
                    let expected: Vec<PathBuf> = match kind {
                        ChangeKind::Removed => Vec::new(),
                        _ => {
                            let importers = core.graph().dependents_of(&changed);
                            if importers.is_empty() {
                                vec![changed.clone()]
                            } else {
                                importers.into_iter().collect()
                            }
                        }
                    };
                    let out = core.step(RuntimeEvent::FileChanged(ChangeEvent::new(kind, changed)));
                    prop_assert_eq!(compiled_sources(&out.commands), expected);
                }
                Step::Imports(i, deps) => {
                    let imports = deps.iter().map(|&d| reference(i, d)).collect();
                    core.step(RuntimeEvent::CompileFinished {
                        source: path(i),
                        outcome: CompileOutcome::Success { imports },
                    });
                }
            }
        }
    }
}
