//! Integration tests for the Tint generator.

use std::fs;

use tempfile::TempDir;
use tint_gen::{Config, GenerateError, Generator, TargetKind};

const DUSK: &str = r##"meta {
  name = "Dusk"
}

palette {
  base = "#191724"
  rose = #ebbcba
}

theme {
  background = palette.base
  accent = palette.rose
}
"##;

fn lenient() -> Generator {
    Generator::new(Config {
        strict_ansi: false,
        ..Config::default()
    })
}

mod config {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_discover_reads_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tint.toml"),
            "default_target = \"flat\"\nstrict_ansi = false\nout_dir = \"dist\"\n",
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.default_target, TargetKind::Flat);
        assert!(!config.strict_ansi);
        assert_eq!(config.out_dir.as_deref(), Some(std::path::Path::new("dist")));
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tint.toml");
        fs::write(&path, "strict_ansi = \"sometimes\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, GenerateError::Config { .. }));
        assert!(err.to_string().contains("tint.toml"), "{err}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, GenerateError::Io { .. }));
    }
}

mod targets {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flat_listing() {
        let output = lenient()
            .generate(DUSK, TargetKind::Flat.target().as_ref())
            .unwrap();

        insta::assert_snapshot!(output, @r###"
        meta.name = "Dusk"
        palette.base = #191724
        palette.rose = #ebbcba
        theme.background = #191724
        theme.accent = #ebbcba
        "###);
    }

    #[test]
    fn test_json_document() {
        let output = lenient()
            .generate(DUSK, TargetKind::Json.target().as_ref())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["meta"]["name"], "Dusk");
        assert_eq!(value["theme"]["accent"], "#ebbcba");
        assert!(value.get("styles").is_none());
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_flat_listing_appends_style_flags() {
        let source = "palette {}\nsyntax {\n  comment {\n    color = \"#6e6a86\"\n    italic = true\n  }\n  keyword = \"#31748f\"\n}";
        let output = lenient()
            .generate(source, TargetKind::Flat.target().as_ref())
            .unwrap();

        assert_eq!(
            output,
            "syntax.comment = #6e6a86 italic\nsyntax.keyword = #31748f\n"
        );
    }

    #[test]
    fn test_strict_generator_refuses_without_ansi() {
        let err = Generator::default()
            .generate(DUSK, TargetKind::Json.target().as_ref())
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingAnsi));
    }
}

mod output {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rendered_file_lands_in_out_dir() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dusk.tint");
        fs::write(&input, DUSK).unwrap();

        let generator = Generator::new(Config {
            strict_ansi: false,
            out_dir: Some(dir.path().join("dist")),
            ..Config::default()
        });
        let target = TargetKind::Flat.target();
        let source = fs::read_to_string(&input).unwrap();
        let output = generator.generate(&source, target.as_ref()).unwrap();

        let destination = generator.output_path(&input, target.as_ref()).unwrap();
        assert_eq!(destination, dir.path().join("dist").join("dusk.txt"));

        fs::create_dir_all(destination.parent().unwrap()).unwrap();
        fs::write(&destination, &output).unwrap();
        assert_eq!(fs::read_to_string(&destination).unwrap(), output);
    }
}
