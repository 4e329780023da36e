use anyhow::Result;
use pretty_assertions::assert_eq;

use super::CliTest;

fn seeded() -> Result<CliTest> {
    let test = CliTest::new()?;
    test.write_file(
        "i18n/meta.yml",
        "greeting.hello:\n  parameters:\n    name:\n      type: string\n",
    )?;
    test.write_file(
        "i18n/en.yml",
        "greeting.hello: \"Hello, {name}!\"\ncart.items:\n  \"count == 1\": one item\n  \"count != 1\": \"{count} items\"\n",
    )?;
    test.write_file("i18n/fr.yml", "greeting.hello: \"Bonjour, {name} !\"\n")?;
    Ok(test)
}

#[test]
fn compiles_a_directory_of_locales() -> Result<()> {
    let test = seeded()?;

    let output = test.command().args(["i18n", "out"]).output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let en = test.read_file("out/en.js")?;
    assert!(en.contains("\"greeting.hello\""));
    assert!(en.contains("\"cart.items\""));
    assert!(en.contains("if (vars[\"count\"] === 1)"));

    let fr = test.read_file("out/fr.js")?;
    assert!(fr.contains("Bonjour"));
    assert!(!fr.contains("cart.items"));

    let helper = test.read_file("out/helper.js")?;
    assert!(helper.contains("export function encodeIfString"));

    Ok(())
}

#[test]
fn reruns_are_byte_identical() -> Result<()> {
    let test = seeded()?;

    assert!(test.command().args(["i18n", "out"]).status()?.success());
    let first_en = test.read_file("out/en.js")?;
    let first_fr = test.read_file("out/fr.js")?;
    let first_helper = test.read_file("out/helper.js")?;

    assert!(test.command().args(["i18n", "out"]).status()?.success());
    assert_eq!(test.read_file("out/en.js")?, first_en);
    assert_eq!(test.read_file("out/fr.js")?, first_fr);
    assert_eq!(test.read_file("out/helper.js")?, first_helper);

    Ok(())
}

#[test]
fn type_conflict_fails_without_writing_output() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("i18n/meta.yml", "")?;
    test.write_file(
        "i18n/en.yml",
        "x:\n  \"n == 1\": one\n  \"n != 1\": many\n",
    )?;
    test.write_file(
        "i18n/fr.yml",
        "x:\n  \"n = petit\": peu\n  \"n = grand\": beaucoup\n",
    )?;

    let output = test.command().args(["i18n", "out"]).output()?;
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("type conflict"), "stderr: {stderr}");
    assert!(stderr.contains('x'));
    assert!(stderr.contains('n'));

    assert!(!test.root().join("out/en.js").exists());
    assert!(!test.root().join("out/fr.js").exists());
    assert!(!test.root().join("out/helper.js").exists());

    Ok(())
}

#[test]
fn missing_meta_file_fails_with_config_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("i18n/en.yml", "k: v\n")?;

    let output = test.command().args(["i18n", "out"]).output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("meta.yml"));

    Ok(())
}

#[test]
fn unreachable_branch_warns_but_succeeds() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("i18n/meta.yml", "")?;
    test.write_file(
        "i18n/en.yml",
        "dup:\n  \"n == 1\": one\n  \"n==1\": shadowed\n  \"n != 1\": many\n",
    )?;

    let output = test.command().args(["i18n", "out"]).output()?;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("warning:"));
    assert!(test.root().join("out/en.js").exists());

    Ok(())
}

#[test]
fn empty_input_produces_only_the_helper() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("i18n/meta.yml", "")?;

    let output = test.command().args(["i18n", "out"]).output()?;
    assert!(output.status.success());
    assert!(test.root().join("out/helper.js").exists());

    Ok(())
}
