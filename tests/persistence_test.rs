use std::fs;

use sieve::classifier::{
    FileSnapshotStore, MemorySnapshotStore, Model, NaiveBayesClassifier, SnapshotFormat,
    SnapshotStore, TrainingCorpus, load_model, load_model_or_empty, save_model,
};
use sieve::error::{Result, SieveError};
use tempfile::TempDir;

fn write_corpus(dir: &TempDir) -> Result<()> {
    fs::write(dir.path().join("theist.txt"), "god is real\nprayer works\n")?;
    fs::write(dir.path().join("neutral.txt"), "nature is beautiful\n\n")?;
    Ok(())
}

#[test]
fn file_store_round_trips_trained_model() -> Result<()> {
    let corpus_dir = TempDir::new()?;
    write_corpus(&corpus_dir)?;
    let corpus = TrainingCorpus::from_path(corpus_dir.path(), true)?;

    let mut classifier = NaiveBayesClassifier::new()?;
    let report = classifier.train_corpus(&corpus)?;
    assert_eq!(report.documents, 3);

    let store_dir = TempDir::new()?;
    let store = FileSnapshotStore::new(store_dir.path())?;
    save_model(&store, "comments", classifier.model(), SnapshotFormat::Binary)?;
    assert!(store.path_for("comments")?.exists());

    let model = load_model(&store, "comments")?.expect("stored model");
    assert_eq!(&model, classifier.model());

    let restored = NaiveBayesClassifier::new()?.with_model(model);
    assert_eq!(
        restored.classify("god answers prayer")?.as_deref(),
        Some("theist")
    );
    Ok(())
}

#[test]
fn missing_snapshot_starts_empty() -> Result<()> {
    let store_dir = TempDir::new()?;
    let store = FileSnapshotStore::new(store_dir.path())?;

    assert!(load_model(&store, "absent")?.is_none());
    let model = load_model_or_empty(&store, "absent")?;
    assert!(!model.is_trained());
    Ok(())
}

#[test]
fn corrupt_snapshot_is_rejected_or_discarded() -> Result<()> {
    let store = MemorySnapshotStore::new();
    let mut model = Model::new();
    model.add_tokens("theist", ["god", "is", "real"])?;

    let mut bytes = model.encode(SnapshotFormat::Json)?;
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    store.save("comments", &bytes)?;

    let err = load_model(&store, "comments").unwrap_err();
    assert!(matches!(err, SieveError::Decode(_)));
    assert_eq!(load_model_or_empty(&store, "comments")?, Model::new());

    store.save("comments", b"not a snapshot")?;
    assert!(load_model(&store, "comments").is_err());
    Ok(())
}

#[test]
fn saving_twice_replaces_previous_snapshot() -> Result<()> {
    let store_dir = TempDir::new()?;
    let (store, key) = FileSnapshotStore::for_file(store_dir.path().join("model.snap"))?;
    assert_eq!(key, "model.snap");

    let mut classifier = NaiveBayesClassifier::new()?;
    classifier.add_document("god is real", "theist")?;
    save_model(&store, &key, classifier.model(), SnapshotFormat::Json)?;

    classifier.add_document("nature is beautiful", "neutral")?;
    save_model(&store, &key, classifier.model(), SnapshotFormat::Json)?;

    let model = load_model(&store, &key)?.expect("stored model");
    assert_eq!(model.total_documents(), 2);
    assert_eq!(model.label_count(), 2);

    store.delete(&key)?;
    assert!(load_model(&store, &key)?.is_none());
    Ok(())
}
