//! Opening the project database described by the configuration.
//!
//! Shared by the `list`, `update` and `check` commands.

use std::path::Path;

use compdb_config::Config;
use compdb_db::{
    BackendRegistry, CommandIter, CompilationDatabase, Complementer, Database, DbResult,
    FileIter, NullDatabase,
};
use compdb_headerdb::HeaderDb;

/// Returns the complementer registered under `name`.
pub fn complementer_for(name: &str) -> Option<Box<dyn Complementer>> {
    match name {
        HeaderDb::NAME => Some(Box::new(HeaderDb)),
        _ => None,
    }
}

/// The database a command works on.
pub enum Project {
    /// No build directory is configured; every query is empty.
    Unconfigured(NullDatabase),
    /// The layered database over the configured build directories.
    Configured(CompilationDatabase),
}

impl Project {
    /// Builds the project database from `config`.
    ///
    /// With `strict`, a build directory whose complementer caches are
    /// missing cannot be added.
    pub fn open(config: &Config, strict: bool) -> Result<Self, Box<dyn std::error::Error>> {
        if config.build_dirs().is_empty() {
            tracing::debug!("no build directory configured");
            return Ok(Project::Unconfigured(NullDatabase));
        }
        let mut db = CompilationDatabase::new(BackendRegistry::with_builtin_backends());
        db.set_raise_on_missing_cache(strict);
        for name in config.complementers() {
            let complementer =
                complementer_for(name).ok_or_else(|| format!("unknown complementer: {name}"))?;
            db.add_complementer(name, complementer)?;
        }
        db.add_directory_patterns(config.build_dirs())?;
        tracing::debug!(
            "opened {} build directories with complementers [{}]",
            db.directories().len(),
            db.complementer_names().join(", ")
        );
        Ok(Project::Configured(db))
    }

    /// The project database behind the generic interface.
    pub fn database(&self) -> &dyn Database {
        match self {
            Project::Unconfigured(db) => db,
            Project::Configured(db) => db,
        }
    }

    /// The layered database, if any build directory is configured.
    pub fn layered_mut(&mut self) -> Option<&mut CompilationDatabase> {
        match self {
            Project::Unconfigured(_) => None,
            Project::Configured(db) => Some(db),
        }
    }

    /// Point lookup, optionally keeping only the first command.
    pub fn compile_commands(&self, path: &Path, unique: bool) -> DbResult<CommandIter<'_>> {
        match self {
            Project::Unconfigured(db) => db.compile_commands(path),
            Project::Configured(db) => db.compile_commands_with(path, unique),
        }
    }

    /// Every file of the database, optionally without repeats.
    pub fn all_files(&self, unique: bool) -> DbResult<FileIter<'_>> {
        match self {
            Project::Unconfigured(db) => db.all_files(),
            Project::Configured(db) => db.all_files_with(unique),
        }
    }

    /// Every compile command, optionally one per file.
    pub fn all_compile_commands(&self, unique: bool) -> DbResult<CommandIter<'_>> {
        match self {
            Project::Unconfigured(db) => db.all_compile_commands(),
            Project::Configured(db) => db.all_compile_commands_with(unique),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compdb_config::{parse_override, ConfigLayer};
    use compdb_db::{write_compile_commands, CompileCommand, COMPILE_COMMANDS_JSON};

    fn config(overrides: &[&str], cwd: &Path) -> Config {
        let overrides: Vec<_> = overrides
            .iter()
            .map(|o| parse_override(o).unwrap())
            .collect();
        Config::from_layers(&[ConfigLayer::from_overrides(&overrides, cwd).unwrap()])
    }

    fn make_build_dir(root: &Path, name: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let command = CompileCommand::new(
            root,
            "a.cpp",
            vec!["c++".to_string(), "-c".to_string(), "a.cpp".to_string()],
        );
        let file = std::fs::File::create(dir.join(COMPILE_COMMANDS_JSON)).unwrap();
        write_compile_commands(file, [&command]).unwrap();
    }

    #[test]
    fn headerdb_is_known() {
        assert!(complementer_for("headerdb").is_some());
        assert!(complementer_for("nope").is_none());
    }

    #[test]
    fn unconfigured_project_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::open(&config(&[], dir.path()), true).unwrap();
        assert!(matches!(project, Project::Unconfigured(_)));
        assert_eq!(project.all_compile_commands(true).unwrap().count(), 0);
        assert_eq!(project.database().all_files().unwrap().count(), 0);
        assert_eq!(project.all_files(true).unwrap().count(), 0);
    }

    #[test]
    fn configured_project_reads_build_dir() {
        let dir = tempfile::tempdir().unwrap();
        make_build_dir(dir.path(), "build");
        let project = Project::open(&config(&["compdb.build_dir=build"], dir.path()), true).unwrap();
        let commands: Vec<_> = project.all_compile_commands(false).unwrap().collect();
        assert_eq!(commands.len(), 1);
        let found = project
            .compile_commands(&dir.path().join("a.cpp"), true)
            .unwrap()
            .count();
        assert_eq!(found, 1);
    }

    #[test]
    fn shared_file_listed_once_when_unique() {
        let dir = tempfile::tempdir().unwrap();
        make_build_dir(dir.path(), "build-debug");
        make_build_dir(dir.path(), "build-release");
        let project = Project::open(&config(&["compdb.build_dir=build-*"], dir.path()), true).unwrap();
        assert_eq!(project.all_files(false).unwrap().count(), 2);
        let files: Vec<_> = project.all_files(true).unwrap().collect();
        assert_eq!(files, [dir.path().join("a.cpp")]);
    }

    #[test]
    fn unknown_complementer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        make_build_dir(dir.path(), "build");
        let config = config(
            &["compdb.build_dir=build", "compdb.complementers=bogus"],
            dir.path(),
        );
        let err = Project::open(&config, true).err().unwrap();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn strict_mode_requires_caches() {
        let dir = tempfile::tempdir().unwrap();
        make_build_dir(dir.path(), "build");
        let config = config(
            &["compdb.build_dir=build", "compdb.complementers=headerdb"],
            dir.path(),
        );
        assert!(Project::open(&config, true).is_err());
        assert!(Project::open(&config, false).is_ok());
    }
}
