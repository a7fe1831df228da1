
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_optional_filename, check_required_filename};
use crate::data_types::consequence::TargetFileKind;

#[derive(Args, Clone)]
#[clap(author, about,
    after_help = &**AFTER_HELP)]
pub struct ImportSettings {
    /// Input annotated variant file in VCF format
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub vcf_filename: PathBuf,

    /// Output consequence file (TSV); a directory gets the standard file name for --kind
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: PathBuf,

    /// Optional codec options file (JSON)
    #[clap(long = "options")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub options_filename: Option<PathBuf>,

    /// Layout of the consequence rows, "ssm" or "sgv"; inferred from an ssm_s.txt/sgv_s.txt output name if omitted
    #[clap(short = 'k')]
    #[clap(long = "kind")]
    #[clap(value_name = "KIND")]
    #[clap(value_parser = TargetFileKind::by_name)]
    #[clap(help_heading = Some("Conversion"))]
    pub kind: Option<TargetFileKind>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_import_settings(mut settings: ImportSettings) -> Result<ImportSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");

    check_required_filename(&settings.vcf_filename, "VCF file");
    check_optional_filename(settings.options_filename.as_deref(), "Options JSON");

    info!("\tVCF: {:?}", settings.vcf_filename);
    if let Some(ofn) = settings.options_filename.as_ref() {
        info!("\tOptions: {ofn:?}");
    }

    info!("Outputs:");
    let kind = match settings.kind {
        Some(k) => k,
        None => match TargetFileKind::by_path(&settings.output_filename) {
            Ok(k) => {
                info!("\tLayout inferred from output name");
                k
            },
            Err(_e) => TargetFileKind::default()
        }
    };
    settings.kind = Some(kind);
    if settings.output_filename.is_dir() {
        settings.output_filename = settings.output_filename.join(kind.output_file_name());
    }
    info!("\tConsequences: {:?}", settings.output_filename);
    info!("\tLayout: {kind}");

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_directory() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = tmp_dir.path().join("in.vcf");
        std::fs::write(&vcf_fn, "##fileformat=VCFv4.2\n").unwrap();

        let settings = ImportSettings {
            vcf_filename: vcf_fn,
            output_filename: tmp_dir.path().to_path_buf(),
            options_filename: None,
            kind: Some(TargetFileKind::SimpleVariant),
            verbosity: 0
        };
        let checked = check_import_settings(settings).unwrap();
        assert_eq!(checked.output_filename, tmp_dir.path().join("sgv_s.txt"));
        assert_eq!(checked.kind, Some(TargetFileKind::SimpleVariant));
    }

    #[test]
    fn test_inferred_kind() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = tmp_dir.path().join("in.vcf");
        std::fs::write(&vcf_fn, "##fileformat=VCFv4.2\n").unwrap();

        let settings = ImportSettings {
            vcf_filename: vcf_fn.clone(),
            output_filename: tmp_dir.path().join("sgv_s.txt"),
            options_filename: None,
            kind: None,
            verbosity: 0
        };
        let checked = check_import_settings(settings).unwrap();
        assert_eq!(checked.kind, Some(TargetFileKind::SimpleVariant));

        // an unrecognized name or a bare directory falls back to ssm
        let settings = ImportSettings {
            vcf_filename: vcf_fn,
            output_filename: tmp_dir.path().to_path_buf(),
            options_filename: None,
            kind: None,
            verbosity: 0
        };
        let checked = check_import_settings(settings).unwrap();
        assert_eq!(checked.kind, Some(TargetFileKind::SmallMutation));
        assert_eq!(checked.output_filename, tmp_dir.path().join("ssm_s.txt"));
    }

    #[test]
    fn test_kind_by_name() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            settings: ImportSettings
        }

        let wrapper = Wrapper::try_parse_from(["import", "--vcf", "in.vcf", "--output", "out.tsv", "--kind", "sgv"]).unwrap();
        assert_eq!(wrapper.settings.kind, Some(TargetFileKind::SimpleVariant));
        assert!(Wrapper::try_parse_from(["import", "--vcf", "in.vcf", "--output", "out.tsv", "--kind", "cnsm"]).is_err());
    }
}
