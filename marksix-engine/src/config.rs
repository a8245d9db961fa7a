use std::path::Path;

use anyhow::{bail, Context, Result};
use marksix_data::models::{DRAW_SIZE, MAX_NUMBER};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Taille d'une grille candidate (identique à un tirage).
pub const SET_SIZE: usize = DRAW_SIZE;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Poids '{name}' invalide : {value} (doit être fini et >= 0)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Taille de pool {pool_size} invalide ({}-{})", SET_SIZE, MAX_NUMBER)]
    InvalidPoolSize { pool_size: usize },

    #[error("Fenêtre de somme invalide : [{min}, {max}]")]
    InvalidSumWindow { min: u32, max: u32 },

    #[error("Facteur de décroissance invalide : {0}")]
    InvalidDecay(f64),

    #[error("Le rapport doit afficher au moins un numéro")]
    EmptyReport,

    #[error("Preset inconnu : '{0}'")]
    UnknownPreset(String),

    #[error("Preset '{0}' déjà présent")]
    DuplicatePreset(String),

    #[error("Poids inconnu : '{0}' (freq, recency, pair, overdue, lastdigit, range, parity, sumrange)")]
    UnknownWeight(String),

    #[error("Surcharge de poids invalide : '{0}' (attendu nom=valeur)")]
    InvalidOverride(String),
}

/// Coefficients des signaux. Leur somme n'a pas à valoir 1 : le score est renormalisé ensuite.
/// `range`, `parity` et `sumrange` sont réservés au façonnage des grilles et ne sont pas appliqués.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub freq: f64,
    pub recency: f64,
    pub pair: f64,
    pub overdue: f64,
    pub lastdigit: f64,
    pub range: f64,
    pub parity: f64,
    pub sumrange: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            freq: 0.28,
            recency: 0.18,
            pair: 0.12,
            overdue: 0.10,
            lastdigit: 0.06,
            range: 0.12,
            parity: 0.06,
            sumrange: 0.08,
        }
    }
}

impl Weights {
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("freq", self.freq),
            ("recency", self.recency),
            ("pair", self.pair),
            ("overdue", self.overdue),
            ("lastdigit", self.lastdigit),
            ("range", self.range),
            ("parity", self.parity),
            ("sumrange", self.sumrange),
        ]
    }

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "freq" => Some(&mut self.freq),
            "recency" => Some(&mut self.recency),
            "pair" => Some(&mut self.pair),
            "overdue" => Some(&mut self.overdue),
            "lastdigit" => Some(&mut self.lastdigit),
            "range" => Some(&mut self.range),
            "parity" => Some(&mut self.parity),
            "sumrange" => Some(&mut self.sumrange),
            _ => None,
        }
    }

    /// Copie des poids avec les surcharges appliquées dans l'ordre, puis validée.
    pub fn with_overrides(mut self, overrides: &[WeightOverride]) -> Result<Self, ConfigError> {
        for ov in overrides {
            let slot = self
                .slot(&ov.name)
                .ok_or_else(|| ConfigError::UnknownWeight(ov.name.clone()))?;
            *slot = ov.value;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Surcharge d'un poids, saisie `nom=valeur`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightOverride {
    pub name: String,
    pub value: f64,
}

pub fn parse_weight_override(s: &str) -> Result<WeightOverride, ConfigError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(s.to_string()))?;
    let name = name.trim();
    if !Weights::default().entries().iter().any(|(n, _)| *n == name) {
        return Err(ConfigError::UnknownWeight(name.to_string()));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride(s.to_string()))?;
    Ok(WeightOverride { name: name.to_string(), value })
}

/// Fenêtre fermée [min, max] visée pour la somme d'une grille.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumWindow {
    pub min: u32,
    pub max: u32,
}

impl SumWindow {
    pub fn contains(&self, sum: u32) -> bool {
        self.min <= sum && sum <= self.max
    }
}

impl Default for SumWindow {
    fn default() -> Self {
        Self { min: 120, max: 240 }
    }
}

/// Paramètres du pipeline, construits une fois et passés à chaque étape.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub weights: Weights,
    pub pool_size: usize,
    pub sum_window: SumWindow,
    pub recency_decay: f64,
    pub report_top: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            pool_size: 12,
            sum_window: SumWindow::default(),
            recency_decay: 0.3,
            report_top: 15,
        }
    }
}

impl PipelineConfig {
    pub fn with_weights(weights: Weights) -> Self {
        Self { weights, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.pool_size < SET_SIZE || self.pool_size > MAX_NUMBER as usize {
            return Err(ConfigError::InvalidPoolSize { pool_size: self.pool_size });
        }
        if self.sum_window.min > self.sum_window.max {
            return Err(ConfigError::InvalidSumWindow {
                min: self.sum_window.min,
                max: self.sum_window.max,
            });
        }
        if !self.recency_decay.is_finite() || self.recency_decay < 0.0 {
            return Err(ConfigError::InvalidDecay(self.recency_decay));
        }
        if self.report_top == 0 {
            return Err(ConfigError::EmptyReport);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub weights: Weights,
}

pub fn default_presets() -> Vec<Preset> {
    vec![Preset {
        id: "default-balanced".to_string(),
        name: "Default Balanced".to_string(),
        weights: Weights::default(),
    }]
}

pub fn find_preset<'a>(presets: &'a [Preset], id: &str) -> Result<&'a Preset, ConfigError> {
    presets
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ConfigError::UnknownPreset(id.to_string()))
}

pub fn add_preset(presets: &mut Vec<Preset>, preset: Preset) -> Result<(), ConfigError> {
    if presets.iter().any(|p| p.id == preset.id) {
        return Err(ConfigError::DuplicatePreset(preset.id));
    }
    preset.weights.validate()?;
    presets.push(preset);
    Ok(())
}

pub fn remove_preset(presets: &mut Vec<Preset>, id: &str) -> Result<Preset, ConfigError> {
    let pos = presets
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| ConfigError::UnknownPreset(id.to_string()))?;
    Ok(presets.remove(pos))
}

/// Écrit les presets par défaut. Un fichier existant n'est remplacé qu'avec `force`.
pub fn init_presets_file(path: &Path, force: bool) -> Result<Vec<Preset>> {
    if path.exists() && !force {
        bail!("{:?} existe déjà (utiliser --force pour l'écraser)", path);
    }
    let presets = default_presets();
    save_presets(&presets, path)?;
    Ok(presets)
}

pub fn save_presets(presets: &[Preset], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(presets)?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_presets(path: &Path) -> Result<Vec<Preset>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let presets: Vec<Preset> = serde_json::from_str(&json)
        .with_context(|| format!("Fichier de presets invalide : {:?}", path))?;
    for preset in &presets {
        preset
            .weights
            .validate()
            .with_context(|| format!("Preset '{}'", preset.id))?;
    }
    Ok(presets)
}
