use log::info;
use std::fs::OpenOptions;

use crate::base::*;

/// Printable AMOVA report of the loci filtering, group assignments and variance partition
pub fn format_report(
    fname_input: &str,
    locus_filter_summary: &LocusFilterSummary,
    group_assignment: &GroupAssignment,
    amova_result: &AmovaResult,
) -> String {
    let mut lines: Vec<String> = vec![];
    lines.push("Genotype file: ".to_owned() + fname_input);
    lines.push(format!(
        "Total SNPs in file: {}",
        locus_filter_summary.n_loci_before
    ));
    lines.push(format!(
        "SNPs after removing all-missing rows: {}",
        locus_filter_summary.n_loci_after
    ));
    lines.push("".to_owned());
    lines.push("Individuals and assigned groups:".to_owned());
    for (sample, &g) in group_assignment
        .samples
        .iter()
        .zip(group_assignment.groups.iter())
    {
        let tag = group_assignment.tags.get(g).map(|t| t.as_str()).unwrap_or("?");
        lines.push(sample.to_owned() + ": " + tag);
    }
    lines.push("".to_owned());
    lines.push("===== AMOVA RESULTS =====".to_owned());
    let partition = &amova_result.partition;
    match (partition.phi_st, &amova_result.permutations) {
        (PhiSt::Defined(phi_st), Some(permutations)) => {
            lines.push(format!("Phi_ST: {:.6}", phi_st));
            lines.push(format!(
                "P-value (perm {}): {:.6}",
                permutations.n_permutations, permutations.p_value
            ));
        }
        (PhiSt::Defined(phi_st), None) => {
            lines.push(format!("Phi_ST: {:.6}", phi_st));
            lines.push("P-value: not computed".to_owned());
        }
        (PhiSt::Undefined, _) => {
            lines.push(
                "Phi_ST: undefined (SS_total is zero, i.e. all pairwise distances are identical)"
                    .to_owned(),
            );
        }
    }
    lines.push(format!("SS_total: {:.3}", partition.ss_total));
    lines.push(format!("SS_within: {:.3}", partition.ss_within));
    lines.push(format!("SS_between: {:.3}", partition.ss_between));
    if let Some(summary) = amova_result
        .permutations
        .as_ref()
        .and_then(|x| x.summary())
    {
        lines.push(format!(
            "Permuted Phi_ST: mean={:.6}; sd={:.6}; 95th percentile={:.6}",
            summary.mean, summary.std_dev, summary.quantile_95
        ));
    }
    lines.join("\n")
}

/// Write the permuted Phi_ST values into a new csv file, refusing to overwrite an existing one
pub fn write_permutations(
    permutation_outcome: &PermutationOutcome,
    fname_output: &str,
) -> Result<String> {
    let file_out = OpenOptions::new()
        .create_new(true)
        .write(true)
        .append(false)
        .open(fname_output)?;
    let mut writer = csv::Writer::from_writer(file_out);
    writer.write_record(["permutation", "phi_st"])?;
    for (i, phi_st) in permutation_outcome.permuted_phi_st.iter().enumerate() {
        writer.write_record([(i + 1).to_string(), phi_st.to_string()])?;
    }
    writer.flush()?;
    info!(
        "Wrote {} permuted Phi_ST values into: {}",
        permutation_outcome.n_permutations, fname_output
    );
    Ok(fname_output.to_owned())
}
