use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::{DrawError, DrawHistory, FeedOrder, RawDraw, DRAW_SIZE};

/// Historique de référence (23 tirages), du plus ancien au plus récent.
pub const MARKSIX_DRAWS: [[u8; DRAW_SIZE]; 23] = [
    [8, 14, 16, 18, 26, 48, 44],
    [13, 21, 33, 41, 44, 46, 43],
    [15, 17, 19, 23, 24, 34, 33],
    [1, 3, 24, 31, 39, 45, 7],
    [5, 6, 18, 19, 30, 39, 7],
    [3, 15, 17, 24, 32, 44, 20],
    [2, 11, 32, 40, 43, 48, 12],
    [5, 13, 17, 18, 31, 44, 2],
    [1, 8, 9, 11, 18, 32, 13],
    [4, 19, 24, 25, 26, 46, 39],
    [6, 7, 27, 36, 39, 43, 1],
    [4, 7, 15, 21, 45, 46, 24],
    [19, 20, 26, 28, 39, 44, 4],
    [10, 17, 22, 33, 40, 41, 31],
    [7, 9, 16, 17, 33, 46, 49],
    [18, 20, 28, 37, 38, 40, 41],
    [10, 11, 28, 30, 37, 39, 15],
    [2, 11, 13, 28, 38, 47, 7],
    [2, 4, 10, 26, 28, 36, 23],
    [19, 26, 33, 35, 36, 39, 5],
    [1, 2, 17, 35, 37, 48, 8],
    [6, 18, 29, 34, 37, 38, 39],
    [4, 6, 26, 28, 34, 40, 25],
];

pub fn builtin_history() -> Result<DrawHistory, DrawError> {
    let raw = MARKSIX_DRAWS.iter().map(|d| RawDraw::new(d)).collect();
    DrawHistory::ingest(raw, FeedOrder::OldestFirst)
}

/// Charge un flux CSV : 7 numéros par ligne, date ISO optionnelle en 8e colonne.
/// Seule la première ligne peut être un en-tête ; toute autre ligne invalide est rejetée.
pub fn load_csv(path: &Path, order: FeedOrder) -> Result<DrawHistory> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    parse_csv(file, order).with_context(|| format!("Flux invalide : {:?}", path))
}

pub fn parse_csv<R: Read>(reader: R, order: FeedOrder) -> Result<DrawHistory> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut raw = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Erreur lecture ligne {}", line + 1))?;
        if line == 0 && is_header(&record) {
            continue;
        }
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        raw.push(parse_record(&record, raw.len())?);
    }

    tracing::debug!(records = raw.len(), "flux CSV lu");
    Ok(DrawHistory::ingest(raw, order)?)
}

/// En-tête : première ligne dont aucune cellule n'est un numéro.
fn is_header(record: &csv::StringRecord) -> bool {
    record.iter().all(|c| c.parse::<u8>().is_err())
}

/// 7 cellules numériques, puis une date ISO optionnelle en 8e colonne.
/// `index` est la position du tirage parmi les lignes de données.
fn parse_record(record: &csv::StringRecord, index: usize) -> Result<RawDraw, DrawError> {
    let malformed = || DrawError::Malformed {
        index,
        content: record.iter().collect::<Vec<_>>().join(","),
    };

    let cells: Vec<&str> = record.iter().collect();
    let (number_cells, date) = match cells.split_last() {
        Some((last, rest)) if cells.len() == DRAW_SIZE + 1 && last.contains('-') => {
            let date = NaiveDate::parse_from_str(last, "%Y-%m-%d").map_err(|_| malformed())?;
            (rest, Some(date))
        }
        _ => (cells.as_slice(), None),
    };

    let numbers = number_cells
        .iter()
        .map(|c| c.parse::<u8>().map_err(|_| malformed()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RawDraw { numbers, date })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_history() {
        let history = builtin_history().unwrap();
        assert_eq!(history.len(), 23);
        assert_eq!(history.draws()[0].numbers(), &[8, 14, 16, 18, 26, 48, 44]);
        assert_eq!(history.latest(1).next().unwrap().numbers(), &[4, 6, 26, 28, 34, 40, 25]);
    }

    #[test]
    fn test_parse_csv_with_header_and_dates() {
        let data = "n1,n2,n3,n4,n5,n6,n7,date\n\
                    1,2,3,4,5,6,7,2024-01-02\n\
                    8,9,10,11,12,13,14,2024-01-04\n";
        let history = parse_csv(data.as_bytes(), FeedOrder::OldestFirst).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.draws()[1].numbers(), &[8, 9, 10, 11, 12, 13, 14]);
        assert!(history.draws()[1].date().is_some());
    }

    #[test]
    fn test_parse_csv_without_dates() {
        let data = "1, 2, 3, 4, 5, 6, 7\n\n49,48,47,46,45,44,43\n";
        let history = parse_csv(data.as_bytes(), FeedOrder::NewestFirst).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.draws()[0].numbers()[0], 49);
    }

    #[test]
    fn test_parse_csv_rejects_short_draw() {
        let data = "1,2,3,4,5,6,7\n1,2,3,4,5,6\n";
        let err = parse_csv(data.as_bytes(), FeedOrder::OldestFirst).unwrap_err();
        let draw_err = err.downcast_ref::<DrawError>().expect("DrawError attendu");
        assert!(matches!(draw_err, DrawError::WrongSize { index: 1, .. }));
    }

    fn draw_error(data: &str) -> DrawError {
        let err = parse_csv(data.as_bytes(), FeedOrder::OldestFirst).unwrap_err();
        err.downcast_ref::<DrawError>().expect("DrawError attendu").clone()
    }

    #[test]
    fn test_parse_csv_rejects_garbage() {
        let err = draw_error("1,2,3,x,5,6,7\n");
        assert_eq!(err, DrawError::Malformed { index: 0, content: "1,2,3,x,5,6,7".to_string() });
    }

    #[test]
    fn test_parse_csv_bad_row_mid_file_not_dropped() {
        let data = "1,2,3,4,5,6,7\nx9,2,3,4,5,6,7\n8,9,10,11,12,13,14\n";
        let err = draw_error(data);
        assert_eq!(err, DrawError::Malformed { index: 1, content: "x9,2,3,4,5,6,7".to_string() });
    }

    #[test]
    fn test_parse_csv_date_first_rejected() {
        let data = "2024-01-02,1,2,3,4,5,6,7\n2024-01-04,8,9,10,11,12,13,14\n";
        let err = draw_error(data);
        assert!(matches!(err, DrawError::Malformed { index: 0, .. }), "{:?}", err);
    }

    #[test]
    fn test_parse_csv_blank_cell_rejected() {
        let err = draw_error("1,2,,3,4,5,6,7\n");
        assert!(matches!(err, DrawError::Malformed { index: 0, .. }), "{:?}", err);
    }

    #[test]
    fn test_parse_csv_eight_numbers_wrong_size() {
        let err = draw_error("1,2,3,4,5,6,7,8\n");
        assert!(matches!(err, DrawError::WrongSize { index: 0, .. }), "{:?}", err);
    }

    #[test]
    fn test_parse_csv_header_only_on_first_line() {
        let data = "n1,n2,n3,n4,n5,n6,n7\n1,2,3,4,5,6,7\nn1,n2,n3,n4,n5,n6,n7\n";
        let err = draw_error(data);
        assert!(matches!(err, DrawError::Malformed { index: 1, .. }), "{:?}", err);
    }

    #[test]
    fn test_parse_csv_invalid_date_rejected() {
        let err = draw_error("1,2,3,4,5,6,7,2024-13-45\n");
        assert!(matches!(err, DrawError::Malformed { index: 0, .. }), "{:?}", err);
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,2,3,4,5,6,7").unwrap();
        writeln!(file, "10,20,30,40,41,42,43").unwrap();
        let history = load_csv(file.path(), FeedOrder::OldestFirst).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv(Path::new("/nonexistent/marksix.csv"), FeedOrder::OldestFirst);
        assert!(err.is_err());
    }
}
