/// Delimiter between the sequence number and the title in a storage key.
///
/// Titles may contain it: decoding splits on the first occurrence only, and a
/// sequence number never contains one.
pub const KEY_DELIMITER: char = ',';

/// Topic alphabet, in the order commands are numbered (`0` is the first).
pub const TOPIC_NAMES: [&str; 28] = [
    "Anthropology",
    "Algebra",
    "Arithmetic",
    "Astronomy",
    "Avionics",
    "Biology",
    "Calculus",
    "Climate",
    "Chemistry",
    "Computers",
    "Design",
    "Economics",
    "Geography",
    "Geology",
    "Geometry",
    "History",
    "Language",
    "Literature",
    "Materials",
    "Medicine",
    "Movies",
    "Music",
    "Philosophy",
    "Physics",
    "Politics",
    "Statistics",
    "Technology",
    "Television",
];

/// How many doublings of tier size the in-tier search tolerates before it
/// starts accepting a coarser final window.
///
/// A tier of length `L` settles once the window is no wider than
/// `2^max(0, floor(log2 L) - MARGIN_SHIFT)`, so tiers under 32 items are
/// always searched down to a single slot and larger tiers stop at roughly
/// `L / 16` candidate positions. Each extra doubling past that point costs
/// no additional questions.
pub const MARGIN_SHIFT: u32 = 4;
