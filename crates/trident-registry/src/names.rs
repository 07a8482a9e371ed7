//! Word-pair daemon name generation.
//!
//! Anonymous daemons get a `<adjective>-<animal>` name sampled from word
//! lists shipped with the crate. Uniqueness against existing registrations
//! is the caller's concern; this module only produces candidates.

use std::sync::LazyLock;

use rand::seq::SliceRandom;

static ADJECTIVES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    include_str!("../data/adjectives.txt")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
});

static ANIMALS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    include_str!("../data/animals.txt")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
});

/// Sample one `<adjective>-<animal>` candidate name.
pub fn candidate() -> String {
    let mut rng = rand::thread_rng();
    // The embedded word lists are non-empty, so choose cannot fail.
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("nameless");
    let animal = ANIMALS.choose(&mut rng).copied().unwrap_or("daemon");
    format!("{adjective}-{animal}")
}
