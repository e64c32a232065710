//! Generate batches of fake-but-plausible documents for loading.
//!
//! Content is random, shape is not: `seq` runs `0..count` in generation
//! order, `hasFlag` is `seq % 3 == 0`, and with [`TimestampSpread::Daily`]
//! document `seq` is stamped `seq` days before the batch's "now".

use crate::document::Document;
use crate::query::AggRange;
use chrono::{DateTime, Datelike, Duration, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

const FIRST_NAMES: &[&str] = &[
    "Thomas", "Brian", "Kim", "Maria", "James", "Linda", "Robert", "Patricia", "Michael",
    "Jennifer", "William", "Elizabeth", "David", "Susan", "Richard", "Jessica", "Joseph", "Sarah",
    "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa", "Anthony", "Betty", "Mark",
    "Margaret", "Steven", "Sandra", "Paul", "Ashley", "Andrew", "Emily", "Joshua", "Donna",
    "Kevin", "Michelle", "George", "Carol",
];

const LAST_NAMES: &[&str] = &[
    "Johnson", "Scott", "Schinner", "Smith", "Williams", "Brown", "Jones", "Garcia", "Miller",
    "Davis", "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris",
    "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King",
    "Wright", "Torres", "Nguyen", "Hill", "Flores",
];

const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Cedar", "Pine", "Elm", "Washington", "Lake", "Hill", "Park", "Sunset",
    "Harbor", "River", "Meadow", "Forest", "Highland", "Church", "Mill", "Spring", "Willow",
    "Ridge",
];

const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Lane", "Road", "Drive", "Court", "Way", "Boulevard", "Place", "Terrace",
];

const CITIES: &[(&str, &str)] = &[
    ("Springfield", "IL"),
    ("Riverside", "CA"),
    ("Franklin", "TN"),
    ("Greenville", "SC"),
    ("Bristol", "CT"),
    ("Clinton", "IA"),
    ("Fairview", "OR"),
    ("Salem", "MA"),
    ("Madison", "WI"),
    ("Georgetown", "TX"),
    ("Arlington", "VA"),
    ("Ashland", "KY"),
];

const ADJECTIVES: &[&str] = &[
    "Ergonomic", "Rustic", "Sleek", "Handcrafted", "Practical", "Refined", "Incredible",
    "Gorgeous", "Tasty", "Licensed", "Generic", "Intelligent", "Recycled", "Elegant", "Modern",
    "Luxurious",
];

const MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Plastic", "Cotton", "Granite", "Rubber", "Metal", "Soft",
    "Fresh", "Frozen", "Bamboo", "Bronze", "Marble",
];

const PRODUCTS: &[&str] = &[
    "Magazine", "Chair", "Car", "Computer", "Keyboard", "Mouse", "Bike", "Ball", "Gloves",
    "Pants", "Shirt", "Table", "Shoes", "Hat", "Towels", "Soap", "Tuna", "Chicken", "Fish",
    "Cheese", "Bacon", "Pizza", "Salad", "Sausages", "Chips",
];

const PURPOSES: &[&str] = &[
    "everyday comfort",
    "long weekends outdoors",
    "busy professionals",
    "the modern kitchen",
    "small apartments",
    "serious collectors",
    "early mornings",
    "family gatherings",
];

const FILLER_WORDS: &[&str] = &[
    "alias", "consequatur", "aut", "perferendis", "sit", "voluptatem", "accusantium",
    "doloremque", "aperiam", "eaque", "ipsa", "quae", "ab", "illo", "inventore", "veritatis",
    "quasi", "architecto", "beatae", "vitae", "dicta", "sunt", "explicabo", "nemo", "enim",
    "ipsam", "quia", "voluptas", "aspernatur", "odit", "fugit", "consequuntur", "magni",
    "dolores", "ratione", "sequi", "nesciunt", "neque", "porro", "quisquam", "dolorem", "ipsum",
    "numquam", "eius", "modi", "tempora", "incidunt", "labore", "dolore", "magnam", "aliquam",
    "quaerat",
];

const FILLER_WORD_COUNT: usize = 20;

fn pick<'a>(rng: &mut StdRng, table: &[&'a str]) -> &'a str {
    table[rng.gen_range(0..table.len())]
}

/// How document timestamps relate to the batch's generation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampSpread {
    /// Every document carries the generation time.
    None,
    /// Document `seq` is `seq` days older than the generation time.
    #[default]
    Daily,
}

#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    count: usize,
    seed: Option<u64>,
    spread: TimestampSpread,
    now: Option<DateTime<Utc>>,
}

impl DatasetGenerator {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            seed: None,
            spread: TimestampSpread::default(),
            now: None,
        }
    }

    /// Fix the RNG seed; ids and content become reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_spread(mut self, spread: TimestampSpread) -> Self {
        self.spread = spread;
        self
    }

    /// Pin the reference time instead of reading the clock.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn generate(&self) -> Dataset {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let now = self.now.unwrap_or_else(Utc::now).trunc_subsecs(3);

        let documents = (0..self.count as u64)
            .map(|seq| {
                let id = match self.seed {
                    Some(_) => uuid::Builder::from_random_bytes(rng.gen()).into_uuid(),
                    None => Uuid::new_v4(),
                };
                let timestamp = match self.spread {
                    TimestampSpread::None => now,
                    TimestampSpread::Daily => now - Duration::days(seq as i64),
                };
                Document {
                    id: id.to_string(),
                    seq,
                    full_name: full_name(&mut rng),
                    address: address(&mut rng),
                    content: content(&mut rng),
                    timestamp,
                    has_flag: Document::flag_for(seq),
                }
            })
            .collect();

        tracing::debug!(
            count = self.count,
            seeded = self.seed.is_some(),
            spread = ?self.spread,
            "generated dataset"
        );

        Dataset {
            documents,
            generated_at: now,
        }
    }
}

fn full_name(rng: &mut StdRng) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

fn address(rng: &mut StdRng) -> String {
    let (city, state) = CITIES[rng.gen_range(0..CITIES.len())];
    format!(
        "{} {} {}, {}, {} {:05}",
        rng.gen_range(1..10_000),
        pick(rng, STREET_NAMES),
        pick(rng, STREET_SUFFIXES),
        city,
        state,
        rng.gen_range(1_000..100_000)
    )
}

fn content(rng: &mut StdRng) -> String {
    let description = format!(
        "{} {} {} designed for {}",
        pick(rng, ADJECTIVES),
        pick(rng, MATERIALS),
        pick(rng, PRODUCTS),
        pick(rng, PURPOSES)
    );
    let filler: Vec<&str> = (0..FILLER_WORD_COUNT)
        .map(|_| pick(rng, FILLER_WORDS))
        .collect();
    format!("{}. {}.", description, filler.join(" "))
}

/// What a loaded dataset should look like from the cluster's side.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProfile {
    pub total: u64,
    pub flagged: u64,
    /// The `seq == 0` document; query probes are derived from it.
    pub anchor: Document,
    /// Calendar months touched by the timestamps, when known.
    pub month_span: Option<u32>,
}

impl DatasetProfile {
    pub fn unflagged(&self) -> u64 {
        self.total.saturating_sub(self.flagged)
    }

    /// Expected count of a range bucket over `seq`, assuming the contiguous
    /// `0..total` sequence.
    pub fn seq_range_count(&self, range: &AggRange) -> u64 {
        let lo = range.from.map_or(0.0, |f| f.max(0.0)).ceil() as u64;
        let hi = range
            .to
            .map_or(self.total, |t| (t.max(0.0).ceil() as u64).min(self.total));
        hi.saturating_sub(lo)
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    documents: Vec<Document>,
    generated_at: DateTime<Utc>,
}

impl Dataset {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn anchor(&self) -> Option<&Document> {
        self.documents.iter().find(|d| d.seq == 0)
    }

    pub fn flagged_count(&self) -> u64 {
        self.documents.iter().filter(|d| d.has_flag).count() as u64
    }

    pub fn seq_range_count(&self, range: &AggRange) -> u64 {
        self.documents
            .iter()
            .filter(|d| range.contains(d.seq as f64))
            .count() as u64
    }

    /// Number of calendar months (UTC) between the oldest and newest
    /// timestamp, inclusive.
    pub fn month_span(&self) -> Option<u32> {
        let oldest = self.documents.iter().map(|d| d.timestamp).min()?;
        let newest = self.documents.iter().map(|d| d.timestamp).max()?;
        let months = |t: DateTime<Utc>| t.year() as i64 * 12 + t.month0() as i64;
        Some((months(newest) - months(oldest) + 1) as u32)
    }

    /// `None` for an empty dataset, which has no anchor.
    pub fn profile(&self) -> Option<DatasetProfile> {
        Some(DatasetProfile {
            total: self.len() as u64,
            flagged: self.flagged_count(),
            anchor: self.anchor()?.clone(),
            month_span: self.month_span(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_seq_contiguous_and_ids_unique() {
        let dataset = DatasetGenerator::new(1000).generate();
        assert_eq!(dataset.len(), 1000);
        for (i, doc) in dataset.documents().iter().enumerate() {
            assert_eq!(doc.seq, i as u64);
        }
        let ids: HashSet<&str> = dataset.documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_flag_distribution() {
        let dataset = DatasetGenerator::new(1000).with_seed(1).generate();
        assert_eq!(dataset.flagged_count(), 334);
        let profile = dataset.profile().unwrap();
        assert_eq!(profile.unflagged(), 666);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = DatasetGenerator::new(50)
            .with_seed(42)
            .with_now(fixed_now())
            .generate();
        let b = DatasetGenerator::new(50)
            .with_seed(42)
            .with_now(fixed_now())
            .generate();
        assert_eq!(a.documents(), b.documents());

        let c = DatasetGenerator::new(50)
            .with_seed(43)
            .with_now(fixed_now())
            .generate();
        assert_ne!(a.documents()[0].id, c.documents()[0].id);
    }

    #[test]
    fn test_daily_spread_descends_with_seq() {
        let dataset = DatasetGenerator::new(10)
            .with_now(fixed_now())
            .generate();
        let docs = dataset.documents();
        assert_eq!(docs[0].timestamp, fixed_now());
        for pair in docs.windows(2) {
            assert_eq!(pair[0].timestamp - pair[1].timestamp, Duration::days(1));
        }
    }

    #[test]
    fn test_no_spread_shares_timestamp() {
        let dataset = DatasetGenerator::new(5)
            .with_spread(TimestampSpread::None)
            .generate();
        let first = dataset.documents()[0].timestamp;
        assert!(dataset.documents().iter().all(|d| d.timestamp == first));
        assert_eq!(dataset.month_span(), Some(1));
    }

    #[test]
    fn test_month_span_over_thousand_days() {
        // 2026-10-17 back 999 days is 2024-01-22: Jan 2024 through Oct 2026.
        let dataset = DatasetGenerator::new(1000)
            .with_now(fixed_now())
            .generate();
        assert_eq!(dataset.month_span(), Some(34));
    }

    #[test]
    fn test_content_shape() {
        let dataset = DatasetGenerator::new(3).with_seed(7).generate();
        for doc in dataset.documents() {
            assert!(doc.content.ends_with('.'));
            let filler = doc.content.split(". ").nth(1).unwrap();
            assert_eq!(filler.trim_end_matches('.').split(' ').count(), 20);
            assert_eq!(doc.full_name.split(' ').count(), 2);
        }
    }

    #[test]
    fn test_seq_range_counts_agree() {
        let dataset = DatasetGenerator::new(1000).with_seed(3).generate();
        let profile = dataset.profile().unwrap();
        let ranges = [
            AggRange::between(0.0, 200.0),
            AggRange::between(200.0, 600.0),
            AggRange::at_least(600.0),
            AggRange::at_least(5000.0),
        ];
        let expected = [200, 400, 400, 0];
        for (range, want) in ranges.iter().zip(expected) {
            assert_eq!(dataset.seq_range_count(range), want);
            assert_eq!(profile.seq_range_count(range), want);
        }
    }

    #[test]
    fn test_empty_dataset_has_no_profile() {
        let dataset = DatasetGenerator::new(0).generate();
        assert!(dataset.is_empty());
        assert!(dataset.profile().is_none());
        assert!(dataset.month_span().is_none());
    }
}
