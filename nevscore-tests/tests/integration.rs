use anyhow::Result;
use util::{output_path, read_output, run_in_repo_root};

mod util;

#[test]
fn test_score_blast_xml() -> Result<()> {
    let output = output_path("blast_xml.csv")?;
    run_in_repo_root(&format!(
        "score -i test_files/sample_blast.xml --signature-file test_files/signatures.txt -o {output}"
    ))?;

    let output = read_output(&output)?;
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ref|XP_000001.1| sample protein one [Homo sapiens],"));
    assert!(lines[1].ends_with(",\"['2,S', '2,A', '7,E', '7,Q']\",\"['12,F', '12,F']\",,0.2727272727272727,1.0"));
    Ok(())
}

#[test]
fn test_score_single_group() -> Result<()> {
    let output = output_path("single_group.csv")?;
    run_in_repo_root(&format!(
        "score -i test_files/sample_blast.xml -s [['4','A']] -o {output}"
    ))?;

    let output = read_output(&output)?;
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(",\"['4,A', '4,A']\",,1.0"));
    assert!(lines[2].ends_with(",\"['0,-', '0,A']\",,0.0"));
    Ok(())
}

#[test]
fn test_score_tsv_with_config() -> Result<()> {
    let output = output_path("tsv.csv")?;
    let raw_output = output_path("tsv_raw.txt")?;
    run_in_repo_root(&format!(
        "score -i test_files/sample_hits.tsv -f tsv --signature-file test_files/signatures_fallback.txt -c test_files/config.toml -o {output} --raw-output {raw_output}"
    ))?;

    let output = read_output(&output)?;
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "identifier,subject_sequence,confidence_value,group_1_residues,group_2_residues,,group_1_score,group_2_score"
    );

    let raw_output = read_output(&raw_output)?;
    assert_eq!(raw_output.lines().count(), 3);
    assert!(raw_output.lines().all(|line| line.ends_with(" ~ ")));
    Ok(())
}

#[test]
fn test_score_is_reproducible() -> Result<()> {
    let first = output_path("reproducible_1.csv")?;
    let second = output_path("reproducible_2.csv")?;
    run_in_repo_root(&format!(
        "score -i test_files/sample_blast.xml --signature-file test_files/signatures.txt -t 1 -o {first}"
    ))?;
    run_in_repo_root(&format!(
        "score -i test_files/sample_blast.xml --signature-file test_files/signatures.txt -t 4 -o {second}"
    ))?;

    assert_eq!(read_output(&first)?, read_output(&second)?);
    Ok(())
}

#[test]
fn test_score_rejects_malformed_signatures() -> Result<()> {
    let output = output_path("malformed.csv")?;
    let result = run_in_repo_root(&format!(
        "score -i test_files/sample_blast.xml -s [[C,10,G]] -o {output}"
    ));
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_matrix() -> Result<()> {
    let output = output_path("matrix.txt")?;
    run_in_repo_root(&format!("matrix -o {output}"))?;

    let output = read_output(&output)?;
    assert_eq!(output.lines().count(), 23);
    assert!(output.lines().nth(2).is_some_and(|line| line.starts_with("C |  9")));
    Ok(())
}
