use std::sync::atomic::AtomicBool;

use noisy_float::types::r64;

use crate::{
    alignment::AlignmentHit,
    conservation::ConservationScorer,
    error::{Error, Result},
    result_table::{ResultTable, ScoringRun, format_float},
    signature::{SignatureGroup, SignatureGroups, SignaturePosition},
};

fn hits() -> Vec<Result<AlignmentHit>> {
    vec![
        Ok(AlignmentHit::new(
            "one",
            "MKTAYIAKQRQISFVKSHFSRQ",
            "MKTAYIAKQRQISFVKSHFSRQ",
            1,
            1e-10,
        )),
        Ok(AlignmentHit::new(
            "two",
            "TSYIAKE-QLISFL",
            "TAYIAKQRQ-ISFV",
            3,
            0.002,
        )),
        Ok(AlignmentHit::new(
            "three",
            "RQ-SFVKSHY",
            "RQISFVKSHF",
            10,
            3.5,
        )),
    ]
}

fn groups() -> SignatureGroups {
    SignatureGroups::new(vec![
        SignatureGroup::new(vec![
            SignaturePosition::new(4, b'A'),
            SignaturePosition::new(9, b'Q'),
        ]),
        SignatureGroup::new(vec![SignaturePosition::new(14, b'F')]),
    ])
}

fn score(hits: Vec<Result<AlignmentHit>>, threads: Option<usize>) -> ResultTable {
    let groups = groups();
    ScoringRun::new(&groups, ConservationScorer::default())
        .with_threads(threads)
        .score(hits, &AtomicBool::new(false))
        .unwrap()
}

fn csv_output(table: &ResultTable, header: bool) -> String {
    let mut output = Vec::new();
    table.write_csv(&mut output, header).unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_rows_in_input_order() {
    let table = score(hits(), Some(3));
    assert_eq!(table.group_count(), 2);
    assert!(table.skipped().is_empty());

    let rows = table.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].identifier, "one");
    assert_eq!(rows[1].identifier, "two");
    assert_eq!(rows[2].identifier, "three");

    assert_eq!(rows[0].per_group[0].normalized_score, r64(1.0));
    assert_eq!(rows[0].per_group[1].normalized_score, r64(1.0));
    assert_eq!(rows[1].per_group[0].normalized_score, r64(3.0 / 11.0));
    assert_eq!(
        rows[1].per_group[0].residue_pairs_text(),
        "['2,S', '2,A', '7,E', '7,Q']"
    );
    assert_eq!(rows[1].per_group[1].residue_pairs_text(), "['12,F', '12,F']");
    assert_eq!(rows[2].per_group[0].normalized_score, r64(0.0));
    assert_eq!(
        rows[2].per_group[0].residue_pairs_text(),
        "['0,-', '0,A', '0,-', '0,Q']"
    );
    assert_eq!(rows[2].per_group[1].residue_pairs_text(), "['4,F', '5,F']");
}

#[test]
fn test_csv_columns() {
    let output = csv_output(&score(hits(), None), false);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(output.as_bytes());
    let records: Vec<_> = reader.records().map(|record| record.unwrap()).collect();

    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.len(), 3 + 2 + 1 + 2);
    }

    let second = &records[1];
    assert_eq!(&second[0], "two");
    assert_eq!(&second[1], "TSYIAKE-QLISFL");
    assert_eq!(&second[2], "0.002");
    assert_eq!(&second[3], "['2,S', '2,A', '7,E', '7,Q']");
    assert_eq!(&second[4], "['12,F', '12,F']");
    assert_eq!(&second[5], "");
    assert_eq!(&second[6], format_float(3.0 / 11.0));
    assert_eq!(&second[7], "1.0");
    assert_eq!(&records[0][2], "1e-10");
}

#[test]
fn test_csv_header() {
    let output = csv_output(&score(hits(), None), true);
    assert_eq!(
        output.lines().next().unwrap(),
        "identifier,subject_sequence,confidence_value,group_1_residues,group_2_residues,,group_1_score,group_2_score"
    );
    assert_eq!(output.lines().count(), 4);
}

#[test]
fn test_output_is_reproducible() {
    let first = score(hits(), Some(1));
    let second = score(hits(), Some(4));
    assert_eq!(csv_output(&first, true), csv_output(&second, true));
    assert_eq!(csv_output(&first, false), csv_output(&first, false));
}

#[test]
fn test_skipped_hits() {
    let mut hits = hits();
    hits.insert(1, Err(Error::EmptyAlignment));
    hits.push(Err(Error::MissingHitField("confidence_value")));

    let table = score(hits, None);
    assert_eq!(table.rows().len(), 3);
    assert_eq!(table.rows()[1].identifier, "two");

    let skipped = table.skipped();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].index, 1);
    assert!(matches!(skipped[0].error, Error::EmptyAlignment));
    assert_eq!(skipped[1].index, 4);
}

#[test]
fn test_cancelled_run() {
    let groups = groups();
    let result = ScoringRun::new(&groups, ConservationScorer::default())
        .score(hits(), &AtomicBool::new(true));
    assert!(matches!(
        result,
        Err(Error::Cancelled { completed_hits: 0 })
    ));
}

#[test]
fn test_without_groups() {
    let groups = SignatureGroups::default();
    let table = ScoringRun::new(&groups, ConservationScorer::default())
        .score(hits(), &AtomicBool::new(false))
        .unwrap();

    assert_eq!(table.rows().len(), 3);
    assert!(table.rows().iter().all(|row| row.per_group.is_empty()));
    assert_eq!(
        table.column_names(),
        ["identifier", "subject_sequence", "confidence_value", ""]
    );
    assert_eq!(
        csv_output(&table, false).lines().next().unwrap(),
        "one,MKTAYIAKQRQISFVKSHFSRQ,1e-10,"
    );
}

#[test]
fn test_raw_output() {
    let mut output = Vec::new();
    score(hits(), None).write_raw(&mut output).unwrap();
    let output = String::from_utf8(output).unwrap();
    let lines: Vec<_> = output.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[2],
        "three ~ RQ-SFVKSHY ~ 3.5 ~ ['0,-', '0,A', '0,-', '0,Q'] ~ ['4,F', '5,F'] ~ "
    );
}

#[test]
fn test_format_float() {
    assert_eq!(format_float(1.0), "1.0");
    assert_eq!(format_float(0.0), "0.0");
    assert_eq!(format_float(-0.25), "-0.25");
    assert_eq!(format_float(3.5), "3.5");
    assert_eq!(format_float(0.002), "0.002");
    assert_eq!(format_float(1e-10), "1e-10");
    assert_eq!(format_float(2.5e-50), "2.5e-50");
}

#[test]
fn test_single_group_rows_have_six_columns() {
    let groups = SignatureGroups::new(vec![SignatureGroup::new(vec![SignaturePosition::new(
        4, b'A',
    )])]);
    let table = ScoringRun::new(&groups, ConservationScorer::default())
        .score(hits(), &AtomicBool::new(false))
        .unwrap();

    let output = csv_output(&table, false);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(output.as_bytes());
    let records: Vec<_> = reader.records().map(|record| record.unwrap()).collect();

    assert_eq!(records.len(), 3);
    for record in &records {
        assert!(record.len() >= 6);
        assert_eq!(&record[4], "");
    }
    assert_eq!(
        output.lines().next().unwrap(),
        "one,MKTAYIAKQRQISFVKSHFSRQ,1e-10,\"['4,A', '4,A']\",,1.0"
    );
    assert_eq!(table.column_names().len(), 6);
}
