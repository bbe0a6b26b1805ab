#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    const CORE: &str = "\
class Vec2:
    \"\"\"A 2D vector.\"\"\"
    x: float
class Align(IntEnum):
    LEFT = 0
def _fx_fade_in(duration: float) -> Effect: ...
";

    const MATH: &str = "\
\"\"\"Scalar helpers.\"\"\"
def clamp(value: float, lo: float, hi: float) -> float: ...
";

    fn package(root: &Path) {
        let core = root.join("pkg/_core");
        fs::create_dir_all(&core).unwrap();
        fs::write(root.join("pkg/__init__.pyi"), "from ._core import *\n").unwrap();
        fs::write(core.join("__init__.pyi"), CORE).unwrap();
        fs::write(root.join("pkg/math.pyi"), MATH).unwrap();
    }

    fn stubdoc(root: &Path) -> Command {
        let mut cmd = Command::cargo_bin("stubdoc").unwrap();
        cmd.current_dir(root)
            .env_remove("RUST_LOG")
            .env_remove("STUBDOC_PATH");
        cmd
    }

    #[test]
    fn writes_pages_under_the_output_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        package(root);

        stubdoc(root)
            .args(["pkg", "--out", "docs", "--type-links", "lib/links.ts"])
            .assert()
            .success();

        let vec2 = fs::read_to_string(root.join("docs/classes/vec2/index.mdx")).unwrap();
        assert!(vec2.starts_with("---\ntitle: Vec2\ndescription: A 2D vector.\n---\n"));
        assert!(root.join("docs/functions/math/index.mdx").is_file());
        assert!(root.join("docs/functions/fx/index.mdx").is_file());
        assert!(root.join("docs/manual/constants/index.mdx").is_file());
        let links = fs::read_to_string(root.join("lib/links.ts")).unwrap();
        assert!(links.contains("  Vec2: \"/docs/classes/vec2\","));
    }

    #[test]
    fn search_path_comes_from_the_environment() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        package(&root.join("stubs"));

        stubdoc(root)
            .env("STUBDOC_PATH", "nowhere:stubs")
            .args(["pkg", "--out", "docs"])
            .assert()
            .success();
        assert!(root.join("docs/classes/vec2/index.mdx").is_file());
    }

    #[test]
    fn raw_prints_the_model_without_writing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        package(root);

        stubdoc(root)
            .args(["pkg", "--raw", "--out", "docs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"Vec2\""))
            .stdout(predicate::str::contains("\"pkg.math\""));
        assert!(!root.join("docs").exists());
    }

    #[test]
    fn missing_package_fails() {
        let temp = TempDir::new().unwrap();

        stubdoc(temp.path())
            .arg("nothere")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Package not found"));
    }

    #[test]
    fn unreadable_member_docs_fail() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        package(root);

        stubdoc(root)
            .args(["pkg", "--member-docs", "absent.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load member docs"));
    }

    #[test]
    fn member_docs_file_documents_enum_members() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        package(root);
        fs::write(
            root.join("docs.json"),
            r#"{"pkg._core": {"Align": {"LEFT": "Flush left."}}}"#,
        )
        .unwrap();

        stubdoc(root)
            .args(["pkg", "--out", "docs", "--member-docs", "docs.json", "--quiet"])
            .assert()
            .success();
        let constants =
            fs::read_to_string(root.join("docs/manual/constants/index.mdx")).unwrap();
        assert!(constants.contains("| `LEFT` | Flush left. | `Align` |"));
    }
}
