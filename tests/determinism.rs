use std::fs;

use atlas_align::{load_corpus, load_observations, AlignConfig, Aligner, FallbackTable, Fallbacks};

const CONFIG: &str = r#"
version: "1.0"
name: crito-farsi
alignment:
  slug: crito-shamsian-word-alignment
  label: "Crito Greek/Farsi"
  version_a: "urn:cts:greekLit:tlg0059.tlg003.perseus-grc2:"
  version_b: "urn:cts:greekLit:tlg0059.tlg003.perseus-far1:"
"#;

const TOKENS_A: &str = "value,word_value,position,ve_ref\n\
ὦ,ὦ,1,43a.t1\n\
Κρίτων,Κρίτων,2,43a.t2\n\
«τί,τί,1,43b.t1\n\
τηνικάδε;»,τηνικάδε,2,43b.t2\n";

const FLAT_B: &str = "43a ای کریتون\n43b چرا این وقت\n";

const OBSERVATIONS: &str = "ref,a,b\n\
43a,ὦ,ای\n\
43a,Κριτων,کریتون\n\
43b,τί,چرا\n\
43b,τηνικάδε,این\n\
43b,τηνικάδε,وقت\n";

fn run_once() -> String {
    let dir = tempfile::tempdir().unwrap();
    let corpus_a = dir.path().join("grc.csv");
    let corpus_b = dir.path().join("far.txt");
    let observations = dir.path().join("observations.csv");
    let fallback = dir.path().join("fallback.json");
    fs::write(&corpus_a, TOKENS_A).unwrap();
    fs::write(&corpus_b, FLAT_B).unwrap();
    fs::write(&observations, OBSERVATIONS).unwrap();
    fs::write(&fallback, "{}").unwrap();

    let config = AlignConfig::from_yaml(CONFIG).unwrap();
    let a = load_corpus(&corpus_a, &config.alignment.version_a).unwrap();
    let b = load_corpus(&corpus_b, &config.alignment.version_b).unwrap();
    let rows = load_observations(&observations).unwrap();
    let table = FallbackTable::load(&fallback).unwrap();

    let alignment = Aligner::new(config)
        .unwrap()
        .align(&a, &b, &rows, Fallbacks { a: Some(&table), b: Some(&table) })
        .unwrap();
    alignment.document.to_json_pretty().unwrap()
}

#[test]
fn identical_inputs_give_identical_documents() {
    let first = run_once();
    let second = run_once();
    assert_eq!(first, second);
}

#[test]
fn document_contents_from_files() {
    let json: serde_json::Value = serde_json::from_str(&run_once()).unwrap();
    let urn = json["urn"].as_str().unwrap();
    assert!(urn.starts_with(
        "urn:cite2:scaife-viewer:alignment.v1:crito-shamsian-word-alignment-"
    ));
    assert_eq!(json["format"], "atlas-standoff-annotation");

    let records = json["records"].as_array().unwrap();
    assert_eq!(records.len(), 4);
    // the phrase τηνικάδε → این وقت is one record with two B tokens
    assert_eq!(
        records[3]["relations"],
        serde_json::json!([
            ["urn:cts:greekLit:tlg0059.tlg003.perseus-grc2:43b.t2"],
            [
                "urn:cts:greekLit:tlg0059.tlg003.perseus-far1:43b.t2",
                "urn:cts:greekLit:tlg0059.tlg003.perseus-far1:43b.t3"
            ]
        ])
    );
    let tail = urn.rsplit(':').next().unwrap();
    assert_eq!(
        records[0]["urn"],
        format!("urn:cite2:scaife-viewer:alignment-record.v1:{tail}_0")
    );
}
