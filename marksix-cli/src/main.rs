mod display;
mod export;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marksix_data::feed::{builtin_history, load_csv};
use marksix_data::models::{DrawHistory, FeedOrder};
use marksix_engine::config::{
    add_preset, default_presets, find_preset, init_presets_file, load_presets, parse_weight_override,
    remove_preset, save_presets, PipelineConfig, Preset, WeightOverride, Weights,
};
use marksix_engine::detail::{last_digit_distribution, number_detail};
use marksix_engine::pipeline::run;

use crate::display::{
    display_candidates, display_detail, display_history, display_pool, display_presets, display_scores,
};

#[derive(Parser)]
#[command(name = "marksix", about = "Scoring des numéros Mark Six et grilles candidates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct FeedArgs {
    /// Fichier CSV des tirages (défaut : historique intégré)
    #[arg(short, long)]
    feed: Option<PathBuf>,

    /// Le fichier liste les tirages du plus récent au plus ancien
    #[arg(long)]
    newest_first: bool,
}

#[derive(Args)]
struct WeightArgs {
    /// Fichier JSON de presets de poids
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Identifiant du preset à utiliser
    #[arg(long, default_value = "default-balanced")]
    preset: String,

    /// Surcharger un poids du preset (ex. --weight pair=0.3), répétable
    #[arg(short, long = "weight", value_parser = parse_weight_override)]
    weights: Vec<WeightOverride>,
}

#[derive(Subcommand)]
enum Command {
    /// Calculer les scores, le pool et les trois grilles
    Predict {
        #[command(flatten)]
        feed: FeedArgs,

        #[command(flatten)]
        weights: WeightArgs,

        /// Taille du pool
        #[arg(long, default_value = "12")]
        pool: usize,

        /// Nombre de scores à afficher
        #[arg(short, long, default_value = "15")]
        top: usize,

        /// Exporter les grilles en CSV
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Détail d'un numéro (partenaires, présence par tirage)
    Detail {
        /// Numéro (1-49)
        number: u8,

        #[command(flatten)]
        feed: FeedArgs,

        #[command(flatten)]
        weights: WeightArgs,
    },

    /// Lister les derniers tirages
    History {
        #[command(flatten)]
        feed: FeedArgs,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Lister, créer ou modifier les presets de poids
    Presets {
        /// Fichier JSON de presets
        #[arg(long, default_value = "presets.json")]
        presets: PathBuf,

        /// Écrire les presets intégrés dans le fichier
        #[arg(long, conflicts_with_all = ["add", "remove"])]
        init: bool,

        /// Écraser un fichier existant avec --init
        #[arg(long, requires = "init")]
        force: bool,

        /// Ajouter un preset (poids par défaut + surcharges --weight)
        #[arg(long, value_name = "ID", conflicts_with = "remove")]
        add: Option<String>,

        /// Nom affiché du preset ajouté (défaut : son identifiant)
        #[arg(long, requires = "add")]
        name: Option<String>,

        /// Poids du preset ajouté (ex. --weight freq=0.4), répétable
        #[arg(short, long = "weight", value_parser = parse_weight_override, requires = "add")]
        weights: Vec<WeightOverride>,

        /// Supprimer un preset
        #[arg(long, value_name = "ID")]
        remove: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Predict { feed, weights, pool, top, export } => {
            cmd_predict(&feed, &weights, pool, top, export.as_deref())
        }
        Command::Detail { number, feed, weights } => cmd_detail(&feed, &weights, number),
        Command::History { feed, last } => cmd_history(&feed, last),
        Command::Presets { presets, init, force, add, name, weights, remove } => {
            let action = match (add, remove) {
                (Some(id), _) => PresetAction::Add {
                    name: name.unwrap_or_else(|| id.clone()),
                    id,
                    overrides: weights,
                },
                (None, Some(id)) => PresetAction::Remove(id),
                (None, None) if init => PresetAction::Init { force },
                (None, None) => PresetAction::List,
            };
            cmd_presets(&presets, action)
        }
    }
}

fn load_history(args: &FeedArgs) -> Result<DrawHistory> {
    let order = if args.newest_first { FeedOrder::NewestFirst } else { FeedOrder::OldestFirst };
    match &args.feed {
        Some(path) => load_csv(path, order),
        None => builtin_history().context("Historique intégré invalide"),
    }
}

fn resolve_presets(path: Option<&Path>) -> Result<Vec<Preset>> {
    match path {
        Some(p) => load_presets(p),
        None => Ok(default_presets()),
    }
}

/// Poids du preset choisi, surcharges `--weight` appliquées. Renvoie aussi le nom du preset.
fn resolve_weights(args: &WeightArgs) -> Result<(String, Weights)> {
    let presets = resolve_presets(args.presets.as_deref())?;
    let preset = find_preset(&presets, &args.preset)?;
    let weights = preset
        .weights
        .with_overrides(&args.weights)
        .with_context(|| format!("Preset '{}'", preset.id))?;
    let label = if args.weights.is_empty() {
        preset.name.clone()
    } else {
        format!("{} (modifié)", preset.name)
    };
    Ok((label, weights))
}

fn cmd_predict(
    feed: &FeedArgs,
    weight_args: &WeightArgs,
    pool_size: usize,
    top: usize,
    export: Option<&Path>,
) -> Result<()> {
    let history = load_history(feed)?;
    let (label, weights) = resolve_weights(weight_args)?;

    let config = PipelineConfig {
        pool_size,
        report_top: top,
        ..PipelineConfig::with_weights(weights)
    };
    let prediction = run(&history, &config)?;

    println!("Preset : {} ({} tirages)", label, history.len());
    display_pool(&prediction.pool, &prediction.scores);
    display_scores(&prediction.top_scores);
    display_candidates(&prediction.candidates, config.sum_window);

    if let Some(path) = export {
        export::export_candidates(&prediction.candidates, path)?;
        println!("\nGrilles exportées dans : {}", path.display());
    }
    Ok(())
}

fn cmd_detail(feed: &FeedArgs, weight_args: &WeightArgs, number: u8) -> Result<()> {
    let history = load_history(feed)?;
    let (label, weights) = resolve_weights(weight_args)?;
    let prediction = run(&history, &PipelineConfig::with_weights(weights))?;
    println!("Preset : {}", label);
    let detail = number_detail(&history, &prediction.features, &prediction.scores, number)
        .with_context(|| format!("Numéro {} hors limites (1-49)", number))?;
    display_detail(&detail, &last_digit_distribution(&prediction.features));
    Ok(())
}

fn cmd_history(feed: &FeedArgs, last: usize) -> Result<()> {
    let history = load_history(feed)?;
    display_history(&history, last);
    Ok(())
}

enum PresetAction {
    List,
    Init { force: bool },
    Add { id: String, name: String, overrides: Vec<WeightOverride> },
    Remove(String),
}

fn cmd_presets(path: &Path, action: PresetAction) -> Result<()> {
    let presets = match action {
        PresetAction::List => {
            if path.exists() { load_presets(path)? } else { default_presets() }
        }
        PresetAction::Init { force } => {
            let presets = init_presets_file(path, force)?;
            println!("Presets intégrés écrits dans : {}", path.display());
            presets
        }
        PresetAction::Add { id, name, overrides } => {
            let mut presets = if path.exists() { load_presets(path)? } else { default_presets() };
            let weights = Weights::default().with_overrides(&overrides)?;
            add_preset(&mut presets, Preset { id: id.clone(), name, weights })?;
            save_presets(&presets, path)?;
            println!("Preset '{}' ajouté dans : {}", id, path.display());
            presets
        }
        PresetAction::Remove(id) => {
            let mut presets = load_presets(path)?;
            remove_preset(&mut presets, &id)?;
            save_presets(&presets, path)?;
            println!("Preset '{}' supprimé de : {}", id, path.display());
            presets
        }
    };
    display_presets(&presets);
    Ok(())
}
