use searchcore::tokenizer::{Normalizer, PorterNormalizer, SimpleNormalizer, SimpleTokenizer, Tokenizer};

#[test]
fn it_canonicalizes_and_lowercases() {
    // Halfwidth katakana folds to fullwidth, decomposed C-cedilla composes.
    assert_eq!(SimpleNormalizer.normalize("ﾘﾝｸ"), "リンク");
    assert_eq!(SimpleNormalizer.normalize("\u{0043}\u{0327}"), "ç");
    assert_eq!(SimpleNormalizer.normalize("\u{00C7}"), "ç");
    assert_eq!(SimpleNormalizer.canonicalize("ＡＢＣ"), "ABC");
}

#[test]
fn it_stems_with_porter() {
    let text = PorterNormalizer.normalize("Running Runners RUN! The café's menu.");
    let words = SimpleTokenizer.strings(&text);
    assert!(words.contains(&"run"));
    assert!(words.contains(&"menu"));
}

#[test]
fn it_splits_on_non_word_characters() {
    let words = SimpleTokenizer.strings("Dette er en test. Test, sa jeg. TEST!");
    assert_eq!(words, vec!["Dette", "er", "en", "test", "Test", "sa", "jeg", "TEST"]);
    assert!(SimpleTokenizer.ranges("  --  ").is_empty());
}
