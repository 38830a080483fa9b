#![no_main]

use libfuzzer_sys::fuzz_target;
use lineq::search::{MatchMode, Strategy};

fuzz_target!(|data: (String, String)| {
    let (line, query) = data;
    let lines = vec![line.clone()];

    // All three hand-rolled scanners must agree with the standard
    // library on substring occurrence
    let expected = line.contains(query.as_str());
    for strategy in [Strategy::Kmp, Strategy::BoyerMoore, Strategy::RabinKarp] {
        assert_eq!(
            strategy.is_match(&lines, &query, MatchMode::Substring),
            expected,
            "{strategy} disagrees on line={line:?} query={query:?}"
        );
    }

    // Whole-line mode must agree with the linear reference
    let linear = Strategy::Linear.is_match(&lines, &query, MatchMode::WholeLine);
    for strategy in [Strategy::Kmp, Strategy::BoyerMoore, Strategy::RabinKarp] {
        assert_eq!(
            strategy.is_match(&lines, &query, MatchMode::WholeLine),
            linear
        );
    }
});
