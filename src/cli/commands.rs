//! Command dispatch and handlers

use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::arena::{Index, SceneArena};
use crate::builder::{LoadedScene, SceneBuilder};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::errors::SceneError;

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Draw { scene }) => _draw(scene.as_deref(), settings),
        Some(Commands::Tree { scene }) => _tree(scene.as_deref(), settings),
        Some(Commands::Leaves { scene }) => _leaves(scene.as_deref(), settings),
        Some(Commands::Check { scene }) => _check(scene.as_deref(), settings),
        Some(Commands::Demo) => _demo(),
        Some(Commands::Config { command }) => _config(command, settings),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

fn resolve_scene(scene: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    scene
        .map(Path::to_path_buf)
        .or_else(|| settings.default_scene.clone())
        .ok_or_else(|| {
            CliError::Usage("no scene file given and no default_scene configured".to_string())
        })
}

fn load_scene(scene: Option<&Path>, settings: &Settings) -> CliResult<LoadedScene> {
    let path = resolve_scene(scene, settings)?;
    debug!("scene file: {:?}", path);
    let mut builder = SceneBuilder::new();
    Ok(builder.build_from_file(&path)?)
}

#[instrument(skip(settings))]
fn _draw(scene: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let loaded = load_scene(scene, settings)?;

    let mut buf = Vec::new();
    for &root in &loaded.roots {
        loaded.arena.draw(root, &mut buf)?;
    }

    let text = String::from_utf8_lossy(&buf);
    for line in text.lines() {
        match &settings.draw_verb {
            Some(verb) => output::info(&format!("{} {}", verb, line)),
            None => output::info(line),
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _tree(scene: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let loaded = load_scene(scene, settings)?;
    for &root in &loaded.roots {
        if let Some(tree) = loaded.arena.to_termtree(root) {
            print!("{}", tree);
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _leaves(scene: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let loaded = load_scene(scene, settings)?;
    let names: Vec<String> = loaded
        .roots
        .iter()
        .flat_map(|&root| loaded.arena.leaf_names(root))
        .collect();
    if !names.is_empty() {
        output::info(&names.iter().join("\n"));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _check(scene: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let loaded = load_scene(scene, settings)?;

    let leaves: usize = loaded
        .roots
        .iter()
        .map(|&root| loaded.arena.leaf_names(root).len())
        .sum();
    let depth = loaded
        .roots
        .iter()
        .map(|&root| loaded.arena.depth(root))
        .max()
        .unwrap_or(0);

    output::success(&format!(
        "scene is valid: {} element(s) in {} root(s)",
        loaded.arena.len(),
        loaded.roots.len()
    ));
    output::detail(&format!("atomic elements: {}", leaves));
    output::detail(&format!("max depth: {}", depth));
    Ok(())
}

/// The classic composition walkthrough: build a scene, draw it, remove
/// one element, draw it again.
#[instrument]
fn _demo() -> CliResult<()> {
    let mut arena = SceneArena::new();
    let root = arena.add_group("root");
    let line_a = arena.add_line("A");
    let sub = arena.add_group("sub");
    let circle_b1 = arena.add_circle("B1");
    let circle_b2 = arena.add_circle("B2");
    let line_c = arena.add_line("C");

    arena.add_child(root, line_a)?;
    arena.add_child(root, sub)?;
    arena.add_child(sub, circle_b1)?;
    arena.add_child(sub, circle_b2)?;
    arena.add_child(root, line_c)?;

    output::header("drawing the composed scene:");
    draw_to_stdout(&arena, root)?;

    arena.remove_child(root, line_c)?;
    output::header("after removing 'C':");
    draw_to_stdout(&arena, root)?;

    Ok(())
}

fn draw_to_stdout(arena: &SceneArena, root: Index) -> CliResult<()> {
    let mut out = std::io::stdout();
    arena.draw(root, &mut out)?;
    Ok(())
}

fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::detail("no config directory available"),
            }
            Ok(())
        }
        ConfigCommands::Init => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("no config directory available".to_string()))?;
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir).map_err(SceneError::Io)?;
            }
            std::fs::write(&path, Settings::template()).map_err(SceneError::Io)?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn _completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
