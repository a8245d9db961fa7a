use chrono::NaiveDate;
use thiserror::Error;

/// Plus grand numéro tirable (univers 1..=49).
pub const MAX_NUMBER: u8 = 49;
/// Nombre de numéros par tirage.
pub const DRAW_SIZE: usize = 7;

/// Itère sur l'univers complet, en ordre croissant.
pub fn universe() -> impl Iterator<Item = u8> + Clone {
    1..=MAX_NUMBER
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("Tirage #{index} : {} numéros au lieu de {} ({numbers:?})", .numbers.len(), DRAW_SIZE)]
    WrongSize { index: usize, numbers: Vec<u8> },

    #[error("Tirage #{index} : numéro {number} hors limites (1-{}) dans {numbers:?}", MAX_NUMBER)]
    OutOfRange { index: usize, number: u8, numbers: Vec<u8> },

    #[error("Tirage #{index} : numéro en double {number} dans {numbers:?}")]
    Duplicate { index: usize, number: u8, numbers: Vec<u8> },

    #[error("Tirage #{index} : ligne invalide '{content}'")]
    Malformed { index: usize, content: String },

    #[error("Tirage #{index} : date {date} antérieure au tirage précédent ({previous})")]
    OutOfOrder { index: usize, date: NaiveDate, previous: NaiveDate },
}

/// Vérifie qu'un tirage brut contient exactement 7 numéros distincts dans 1..=49.
/// `index` est la position du tirage dans le flux, reprise dans l'erreur.
pub fn validate_draw(index: usize, numbers: &[u8]) -> Result<(), DrawError> {
    if numbers.len() != DRAW_SIZE {
        return Err(DrawError::WrongSize { index, numbers: numbers.to_vec() });
    }
    for &n in numbers {
        if n < 1 || n > MAX_NUMBER {
            return Err(DrawError::OutOfRange { index, number: n, numbers: numbers.to_vec() });
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                return Err(DrawError::Duplicate { index, number: numbers[i], numbers: numbers.to_vec() });
            }
        }
    }
    Ok(())
}

/// Tirage validé. Immuable après ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    numbers: [u8; DRAW_SIZE],
    date: Option<NaiveDate>,
}

impl Draw {
    pub fn new(index: usize, numbers: &[u8], date: Option<NaiveDate>) -> Result<Self, DrawError> {
        validate_draw(index, numbers)?;
        let mut arr = [0u8; DRAW_SIZE];
        arr.copy_from_slice(numbers);
        Ok(Self { numbers: arr, date })
    }

    /// Numéros dans l'ordre du flux.
    pub fn numbers(&self) -> &[u8; DRAW_SIZE] {
        &self.numbers
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }
}

/// Tirage tel que lu depuis le flux, avant validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDraw {
    pub numbers: Vec<u8>,
    pub date: Option<NaiveDate>,
}

impl RawDraw {
    pub fn new(numbers: &[u8]) -> Self {
        Self { numbers: numbers.to_vec(), date: None }
    }

    pub fn dated(numbers: &[u8], date: NaiveDate) -> Self {
        Self { numbers: numbers.to_vec(), date: Some(date) }
    }
}

/// Convention d'ordre du flux d'entrée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Historique ordonné du plus ancien au plus récent : le dernier tirage est le plus récent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawHistory {
    draws: Vec<Draw>,
}

impl DrawHistory {
    /// Valide chaque tirage puis normalise l'ordre (plus ancien d'abord).
    /// Si tous les tirages sont datés, les dates doivent être croissantes après normalisation.
    pub fn ingest(raw: Vec<RawDraw>, order: FeedOrder) -> Result<Self, DrawError> {
        let total = raw.len();
        let mut draws = raw
            .iter()
            .enumerate()
            .map(|(i, r)| Draw::new(i, &r.numbers, r.date))
            .collect::<Result<Vec<_>, _>>()?;

        if order == FeedOrder::NewestFirst {
            draws.reverse();
        }
        let feed_index = |pos: usize| match order {
            FeedOrder::OldestFirst => pos,
            FeedOrder::NewestFirst => total - 1 - pos,
        };

        if draws.iter().all(|d| d.date.is_some()) {
            for pos in 1..draws.len() {
                if let (Some(previous), Some(date)) = (draws[pos - 1].date, draws[pos].date) {
                    if date < previous {
                        return Err(DrawError::OutOfOrder { index: feed_index(pos), date, previous });
                    }
                }
            }
        }

        tracing::debug!(draws = draws.len(), ?order, "historique ingéré");
        Ok(Self { draws })
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Draw> {
        self.draws.iter()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Les `n` derniers tirages, du plus récent au plus ancien.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &Draw> {
        self.draws.iter().rev().take(n)
    }
}
