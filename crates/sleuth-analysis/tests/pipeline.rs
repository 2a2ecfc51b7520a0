mod common;

use common::{GETTYSBURG, TALE};
use sleuth_analysis::xor::repeating_key_xor;
use sleuth_analysis::{
    AcceptancePolicy, AnalysisConfig, EnglishScorer, FrequencyAnalysis, KeyLengthEstimator,
    PatternIndex, PatternIndexStore, RepeatingKeyXorBreaker, SingleByteXorSolver,
    SukhotinClassifier,
};

const KEY: &[u8] = b"Copper Kettle";

#[test]
fn corpora_are_fully_english() {
    assert_eq!(EnglishScorer::score(TALE), 1.0);
    assert_eq!(EnglishScorer::score(GETTYSBURG), 1.0);
}

#[test]
fn breaks_repeating_key_xor() {
    let ciphertext = repeating_key_xor(TALE.as_bytes(), KEY).unwrap();

    let ranking = KeyLengthEstimator::default().rank(&ciphertext[..240]).unwrap();
    assert_eq!(ranking.best().map(|c| c.key_length), Some(KEY.len()));

    let broken = RepeatingKeyXorBreaker::default().break_xor(&ciphertext).unwrap();
    assert_eq!(broken.key_length, 13);
    assert_eq!(broken.key, KEY);
    assert_eq!(broken.key_text(), "Copper Kettle");
    assert_eq!(broken.plaintext, TALE);
    assert!(broken.min_score() > 0.91);
}

#[test]
fn true_key_length_ranks_in_top_three() {
    let cases: [(&str, &[u8]); 4] = [
        (TALE, b"Copper Kettle"),
        (TALE, b"Velvet Moth"),
        (GETTYSBURG, b"ICE"),
        (GETTYSBURG, b"Velvet Moth"),
    ];

    for (plaintext, key) in cases {
        let ciphertext = repeating_key_xor(plaintext.as_bytes(), key).unwrap();
        let ranking = KeyLengthEstimator::default().rank(&ciphertext[..240]).unwrap();
        let top: Vec<usize> = ranking.top(3).iter().map(|c| c.key_length).collect();
        assert!(top.contains(&key.len()), "key {:?}: top three {:?}", key, top);

        let broken = RepeatingKeyXorBreaker::default().break_xor(&ciphertext).unwrap();
        assert_eq!(broken.key, key);
        assert_eq!(broken.plaintext, plaintext);
    }
}

#[test]
fn sampled_columns_policy_agrees() {
    let ciphertext = repeating_key_xor(TALE.as_bytes(), KEY).unwrap();
    let config = AnalysisConfig {
        acceptance: AcceptancePolicy::SampledColumns { columns: 3 },
        ..AnalysisConfig::default()
    };

    let broken = RepeatingKeyXorBreaker::from_config(&config)
        .unwrap()
        .break_xor(&ciphertext)
        .unwrap();
    assert_eq!(broken.key, KEY);
    assert_eq!(broken.plaintext, TALE);
}

#[test]
fn each_column_solves_independently() {
    let ciphertext = repeating_key_xor(TALE.as_bytes(), KEY).unwrap();
    let column: Vec<u8> = ciphertext.iter().step_by(KEY.len()).copied().collect();

    let candidate = SingleByteXorSolver::solve(&column).unwrap();
    assert_eq!(candidate.key, b'C');
    assert_eq!(candidate.score, 1.0);
}

#[test]
fn sukhotin_finds_vowels_in_prose() {
    for text in [TALE, GETTYSBURG] {
        let classification = SukhotinClassifier::default().classify(text).unwrap();
        let vowels = classification.vowels();
        assert_eq!(vowels.len(), 5);
        assert_eq!(vowels[0], 'e');

        let true_vowels = vowels.iter().filter(|c| "aeiou".contains(**c)).count();
        assert!(true_vowels >= 4, "got {:?}", vowels);
    }
}

#[test]
fn cryptogram_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let wordlist = dir.path().join("words.txt");
    let words: Vec<&str> = FrequencyAnalysis::words(TALE);
    std::fs::write(&wordlist, words.join("\n")).unwrap();

    let store = PatternIndexStore::at_path(dir.path().join("index.json"));
    let index = store.load_or_build(&wordlist, '%').unwrap();
    assert_eq!(store.load().unwrap().as_ref(), Some(&index));
    assert_eq!(store.load_or_build(&wordlist, '%').unwrap(), index);

    // "foolishness" under a letter-for-letter substitution
    let matches = index.matching("qwwertyuptt", &[(0, 'f')]).unwrap();
    assert_eq!(matches, vec!["foolishness"]);

    let fresh = PatternIndex::from_words(words, '%');
    assert_eq!(fresh, index);
}
