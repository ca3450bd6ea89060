//! `compdb update`: recomputes the complementer caches.

use compdb_db::UpdateEvent;

use crate::session::Project;
use crate::GlobalArgs;

/// Formats a progress event as a right-aligned status line.
pub fn format_event(event: UpdateEvent<'_>) -> String {
    match event {
        UpdateEvent::Begin { complementer } => format!("{:>12} {complementer}", "Complementing"),
        UpdateEvent::Saving { file } => format!(
            "{:>12} {}",
            "Saving",
            compdb_common::friendly_path(file).display()
        ),
        UpdateEvent::End { complementer } => format!("{:>12} {complementer}", "Finished"),
    }
}

/// Runs `compdb update`.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = global.load_config()?;
    let mut project = Project::open(&config, false)?;
    let Some(db) = project.layered_mut() else {
        return Err("no build directory configured".into());
    };
    if db.complementer_names().is_empty() && !global.quiet {
        eprintln!("{:>12} no complementer configured", "Skipping");
    }
    db.update_complements(|event| {
        if !global.quiet {
            eprintln!("{}", format_event(event));
        }
    })?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use compdb_config::{parse_override, Config, ConfigLayer};
    use compdb_db::{write_compile_commands, CompileCommand, Database, COMPILE_COMMANDS_JSON};
    use std::path::Path;

    #[test]
    fn status_lines_are_aligned() {
        assert_eq!(
            format_event(UpdateEvent::Begin {
                complementer: "headerdb"
            }),
            "Complementing headerdb"
        );
        assert_eq!(
            format_event(UpdateEvent::End {
                complementer: "headerdb"
            }),
            "    Finished headerdb"
        );
        let line = format_event(UpdateEvent::Saving {
            file: Path::new("/nonexistent/deep/tree/build/headerdb.json"),
        });
        assert_eq!(line, "      Saving /nonexistent/deep/tree/build/headerdb.json");
    }

    #[test]
    fn update_then_strict_open_sees_headers() {
        let dir = tempfile::tempdir().unwrap();
        let root = compdb_common::absolute(dir.path());
        std::fs::write(root.join("a.cpp"), "#include \"a.h\"\n").unwrap();
        std::fs::write(root.join("a.h"), "").unwrap();
        let build = root.join("build");
        std::fs::create_dir_all(&build).unwrap();
        let file = std::fs::File::create(build.join(COMPILE_COMMANDS_JSON)).unwrap();
        write_compile_commands(file, [CompileCommand::new(&root, "a.cpp", ["cc", "-c", "a.cpp"])])
            .unwrap();

        let overrides = [
            parse_override("compdb.build_dir=build").unwrap(),
            parse_override("compdb.complementers=headerdb").unwrap(),
        ];
        let config = Config::from_layers(&[ConfigLayer::from_overrides(&overrides, &root).unwrap()]);

        let mut project = Project::open(&config, false).unwrap();
        let mut events = Vec::new();
        project
            .layered_mut()
            .unwrap()
            .update_complements(|e| events.push(format_event(e)))
            .unwrap();
        assert_eq!(events.len(), 3);
        assert!(build.join("headerdb.json").is_file());

        let project = Project::open(&config, true).unwrap();
        let files: Vec<_> = project.database().all_files().unwrap().collect();
        assert_eq!(files, [root.join("a.cpp"), root.join("a.h")]);
    }
}
