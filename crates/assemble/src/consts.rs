use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Lecture names are lowercase identifiers; anything else idles the loader.
regex!(LECTURE_ID, r"^[_a-z]+$");
