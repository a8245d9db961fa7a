use std::path::Path;

use anyhow::{Context, Result};

use marksix_engine::assembly::Candidate;

/// Une ligne par grille : set,strategy,n1..n7,sum.
pub fn export_candidates(candidates: &[Candidate], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible de créer {:?}", path))?;

    writer.write_record(["set", "strategy", "n1", "n2", "n3", "n4", "n5", "n6", "n7", "sum"])?;
    for c in candidates {
        let mut record = vec![c.strategy.letter().to_string(), c.strategy.to_string()];
        record.extend(c.set.numbers().iter().map(|n| n.to_string()));
        record.push(c.set.sum().to_string());
        writer.write_record(&record)?;
    }
    writer.flush().context("Échec de l'écriture du CSV")?;
    Ok(())
}
