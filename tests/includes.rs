use std::fs;
use std::path::Path;

use audio_policy_config::{AudioPolicyConfig, ConfigLoader, LoadOptions};
use pretty_assertions::assert_eq;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

const ROOT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<audioPolicyConfiguration version="1.0" xmlns:xi="http://www.w3.org/2001/XInclude">
    <modules>
        <module name="primary">
            <mixPort name="primary output" role="source"/>
            <devicePort tagName="Speaker" type="AUDIO_DEVICE_OUT_SPEAKER" role="sink"/>
            <route type="mix" sink="Speaker" sources="primary output"/>
        </module>
        <xi:include href="modules/usb_audio_policy_configuration.xml"/>
        <xi:include href="missing_audio_policy_configuration.xml"/>
    </modules>
    <xi:include href="surround_sound_configuration.xml"/>
</audioPolicyConfiguration>"#;

const USB: &str = r#"<module name="usb" halVersion="2.0">
    <mixPort name="usb_device output" role="source"/>
    <devicePort tagName="USB Device Out" type="AUDIO_DEVICE_OUT_USB_DEVICE" role="sink"/>
    <route type="mix" sink="USB Device Out" sources="usb_device output"/>
</module>"#;

const SURROUND: &str = r#"<surroundSound>
    <formats><format name="AUDIO_FORMAT_AC3"/></formats>
</surroundSound>"#;

#[test]
fn test_includes_relative_to_document() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("modules")).unwrap();
    write(dir.path(), "audio_policy_configuration.xml", ROOT);
    write(dir.path(), "modules/usb_audio_policy_configuration.xml", USB);
    write(dir.path(), "surround_sound_configuration.xml", SURROUND);

    let config = AudioPolicyConfig::load(
        dir.path().join("audio_policy_configuration.xml"),
        LoadOptions::default(),
    )
    .unwrap();

    let names: Vec<_> = config.modules().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["primary", "usb"]);
    assert_eq!(config.module("usb").unwrap().routes().count(), 1);
    assert_eq!(config.surround_formats().len(), 1);
}

#[test]
fn test_in_memory_document_uses_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "usb.xml", USB);

    let xml = r#"<audioPolicyConfiguration version="1.0" xmlns:xi="http://www.w3.org/2001/XInclude">
        <modules><xi:include href="usb.xml"/></modules>
    </audioPolicyConfiguration>"#;
    let config = ConfigLoader::new(LoadOptions::default())
        .base_dir(dir.path())
        .load_str(xml)
        .unwrap();
    assert!(config.module("usb").is_some());
}

#[test]
fn test_nested_include_of_included_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("vendor")).unwrap();
    write(
        dir.path(),
        "vendor/modules.xml",
        r#"<modules xmlns:xi="http://www.w3.org/2001/XInclude"><xi:include href="usb.xml"/></modules>"#,
    );
    write(dir.path(), "vendor/usb.xml", USB);
    write(
        dir.path(),
        "policy.xml",
        r#"<audioPolicyConfiguration version="1.0" xmlns:xi="http://www.w3.org/2001/XInclude">
            <xi:include href="vendor/modules.xml"/>
        </audioPolicyConfiguration>"#,
    );

    let config = AudioPolicyConfig::load(dir.path().join("policy.xml"), LoadOptions::default())
        .unwrap();
    assert_eq!(config.modules().len(), 1);
    assert!(config.module("usb").is_some());
}
