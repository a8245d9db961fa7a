use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use marksix_data::models::DrawHistory;
use marksix_engine::assembly::{Candidate, RepairOutcome};
use marksix_engine::config::{Preset, SumWindow};
use marksix_engine::detail::NumberDetail;
use marksix_engine::pool::Pool;
use marksix_engine::scoring::{NumberScore, ScoreTable};

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_pool(pool: &Pool, scores: &ScoreTable) {
    println!("\n🎯 Pool ({} numéros)\n", pool.len());
    let mut table = new_table(vec!["Rang", "Numéro", "Score"]);
    for (rank, &n) in pool.numbers().iter().enumerate() {
        table.add_row(vec![
            format!("{}", rank + 1),
            format!("{:2}", n),
            format!("{:.3}", scores.score(n)),
        ]);
    }
    println!("{table}");
}

pub fn display_scores(entries: &[NumberScore]) {
    println!("\n📊 Scores (top {})\n", entries.len());
    let mut table = new_table(vec!["Numéro", "Score", "Fréquence"]);
    for e in entries {
        table.add_row(vec![
            format!("{:2}", e.number),
            format!("{:.3}", e.score),
            e.frequency.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_candidates(candidates: &[Candidate], window: SumWindow) {
    println!("\n🎲 Grilles candidates (somme visée {}-{})\n", window.min, window.max);
    let mut table = new_table(vec!["Grille", "Stratégie", "Numéros", "Somme", "Réparation"]);
    for c in candidates {
        let (repair, color) = match c.outcome {
            RepairOutcome::InWindow => ("—".to_string(), Color::Green),
            RepairOutcome::Swapped { removed, added, .. } => (format!("{} → {}", removed, added), Color::Yellow),
            RepairOutcome::OutOfWindow => ("hors fenêtre".to_string(), Color::Red),
        };
        table.add_row(vec![
            Cell::new(c.strategy.letter()),
            Cell::new(c.strategy.to_string()),
            Cell::new(join_numbers(c.set.numbers())),
            Cell::new(c.set.sum()).fg(color),
            Cell::new(repair),
        ]);
    }
    println!("{table}");
}

pub fn display_history(history: &DrawHistory, last: usize) {
    if history.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["#", "Date", "Numéros", "Somme"]);
    let total = history.len();
    for (i, draw) in history.latest(last).enumerate() {
        let mut sorted = *draw.numbers();
        sorted.sort();
        let date = draw
            .date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            format!("{}", total - i),
            date,
            join_numbers(&sorted),
            draw.sum().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_detail(detail: &NumberDetail, last_digits: &[(u8, u32)]) {
    println!("\n🔎 Numéro {}\n", detail.number);
    println!("  Score             : {:.3}", detail.score);
    println!("  Fréquence         : {}", detail.frequency);
    println!("  Récence           : {:.4}", detail.recency);
    println!("  Classe chiffre {}  : {}", detail.number % 10, detail.last_digit_score);
    if detail.overdue {
        println!("  En retard         : jamais sorti");
    }

    let timeline: String = detail
        .timeline
        .iter()
        .map(|&present| if present { '●' } else { '·' })
        .collect();
    println!("  Présence          : {}", timeline);

    println!("\n── Partenaires ──");
    let mut table = new_table(vec!["Numéro", "Co-occurrences", "Fréquence"]);
    for p in &detail.top_partners {
        table.add_row(vec![
            format!("{:2}", p.number),
            p.joint.to_string(),
            p.frequency.to_string(),
        ]);
    }
    println!("{table}");

    println!("\n── Derniers chiffres ──");
    let mut table = new_table(vec!["Chiffre", "Apparitions"]);
    for &(digit, count) in last_digits {
        let cell = Cell::new(count);
        let cell = if digit == detail.number % 10 { cell.fg(Color::Cyan) } else { cell };
        table.add_row(vec![Cell::new(digit), cell]);
    }
    println!("{table}");
}

pub fn display_presets(presets: &[Preset]) {
    let mut table = new_table(vec![
        "Id", "Nom", "freq", "recency", "pair", "overdue", "lastdigit", "range", "parity", "sumrange",
    ]);
    for p in presets {
        let mut row = vec![p.id.clone(), p.name.clone()];
        row.extend(p.weights.entries().iter().map(|(_, w)| format!("{:.2}", w)));
        table.add_row(row);
    }
    println!("{table}");
}
