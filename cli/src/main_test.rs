mod tests {
    use crate::*;

    #[test]
    fn test_sanitize_path_allows_simple_relative() {
        let p = sanitize_path("foo/bar.nv").expect("relative path should be allowed");
        assert_eq!(p, PathBuf::from("foo/bar.nv"));
    }

    #[test]
    fn test_sanitize_path_rejects_parent_dir() {
        let err = sanitize_path("foo/../bar.nv").unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[cfg(unix)]
    #[test]
    fn test_sanitize_path_allows_absolute_unix() {
        let p = sanitize_path("/tmp/prog.nv").expect("absolute path should be allowed");
        assert_eq!(p, PathBuf::from("/tmp/prog.nv"));
    }

    #[test]
    fn test_cli_args_accepts_simple_file() {
        let args = CliArgs::try_parse_from(["nv", "a.nv"]).expect("should parse");
        assert!(args.command.is_none());
        assert!(!args.no_opt);
        assert_eq!(args.file.as_deref(), Some(Path::new("a.nv")));
    }

    #[test]
    fn test_cli_args_no_opt_flag() {
        let args = CliArgs::try_parse_from(["nv", "--no-opt", "a.nv"]).expect("should parse");
        assert!(args.no_opt);
    }

    #[test]
    fn test_cli_args_interp_flag() {
        let args = CliArgs::try_parse_from(["nv", "--interp", "a.nv"]).expect("should parse");
        assert!(args.interp);
        assert!(!args.no_opt);
        let args = CliArgs::try_parse_from(["nv", "a.nv"]).expect("should parse");
        assert!(!args.interp);
    }

    #[test]
    fn test_cli_args_rejects_parent_dir() {
        assert!(CliArgs::try_parse_from(["nv", "../a.nv"]).is_err());
        assert!(CliArgs::try_parse_from(["nv", "compile", "x/../a.nv"]).is_err());
        assert!(CliArgs::try_parse_from(["nv", "dump", "ast", "../a.nv"]).is_err());
    }

    #[test]
    fn test_cli_args_compile_defaults() {
        let args = CliArgs::try_parse_from(["nv", "compile", "foo.nv"]).expect("should parse compile");
        let Some(Commands::Compile { file, format, no_opt }) = args.command else {
            panic!("expected compile command");
        };
        assert_eq!(file, PathBuf::from("foo.nv"));
        assert_eq!(format, OutputFormat::Text);
        assert!(!no_opt);
    }

    #[test]
    fn test_cli_args_compile_json() {
        let args = CliArgs::try_parse_from(["nv", "compile", "foo.nv", "--format", "json", "--no-opt"])
            .expect("should parse compile");
        let Some(Commands::Compile { format, no_opt, .. }) = args.command else {
            panic!("expected compile command");
        };
        assert_eq!(format, OutputFormat::Json);
        assert!(no_opt);
    }

    #[test]
    fn test_cli_args_dump() {
        let args = CliArgs::try_parse_from(["nv", "dump", "tokens", "foo.nv", "--json"]).expect("should parse dump");
        let Some(Commands::Dump { what, json, .. }) = args.command else {
            panic!("expected dump command");
        };
        assert_eq!(what, DumpKind::Tokens);
        assert!(json);
        assert!(CliArgs::try_parse_from(["nv", "dump", "bytes", "foo.nv"]).is_err());
    }

    #[test]
    fn test_env_toggle() {
        assert!(env_toggle_enabled("1"));
        assert!(env_toggle_enabled("nv_core=trace"));
        assert!(!env_toggle_enabled("off"));
        assert!(!env_toggle_enabled(" "));
        assert_eq!(filter_expr_from("true"), None);
        assert_eq!(filter_expr_from("nv::vm=trace"), Some("nv::vm=trace".to_string()));
    }
}
