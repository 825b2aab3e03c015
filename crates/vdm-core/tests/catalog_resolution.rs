//! Catalog resolution against scripted listing pages: exact hits,
//! archive fallback, unavailable targets, and archive expansion.

mod common;

use std::time::Duration;

use common::fake_portal::{Effect, FakePortal, NodeSpec};
use vdm_core::catalog::{self, archive};
use vdm_core::console::ScriptedConsole;
use vdm_core::dom::WaitPolicy;
use vdm_core::portal;
use vdm_core::version::VersionSpec;
use vdm_core::{artifact, Error};

fn fast() -> WaitPolicy {
    WaitPolicy {
        timeout: Duration::from_secs(2),
        interval: Duration::from_millis(5),
    }
}

fn v(s: &str) -> VersionSpec {
    VersionSpec::parse(s).unwrap()
}

/// Flat listing with 2024.1, 2024.2, a non-version label, and the
/// archive entry.
fn listing() -> FakePortal {
    let fp = FakePortal::new("https://portal.test/downloads");
    fp.add_node(
        NodeSpec::at(portal::VERSION_NAV)
            .text("2024.1")
            .attr("href", "https://portal.test/v/2024-1"),
    );
    fp.add_node(
        NodeSpec::at(portal::VERSION_NAV)
            .text("2024.2")
            .attr("href", "https://portal.test/v/2024-2"),
    );
    fp.add_node(NodeSpec::at(portal::VERSION_NAV).text("Loading ..."));
    fp.add_node(
        NodeSpec::at(portal::VERSION_NAV)
            .text("Vivado Archive")
            .attr("href", "https://portal.test/archive"),
    );
    fp
}

#[tokio::test]
async fn exact_listing_entry_is_returned() {
    let fp = listing();
    let catalog = catalog::scan(&fp, &fast()).await.unwrap();
    let entry = catalog.resolve(&v("2024.1")).unwrap();
    assert!(!entry.from_archive);

    let url = catalog::open_entry(&fp, &fast(), &entry).await.unwrap();
    assert_eq!(url, "https://portal.test/v/2024-1");
    assert_eq!(fp.url(), "https://portal.test/v/2024-1");
}

#[tokio::test]
async fn unlisted_version_falls_back_to_archive() {
    let fp = listing();
    let catalog = catalog::scan(&fp, &fast()).await.unwrap();
    let entry = catalog.resolve(&v("2021.2")).unwrap();
    assert!(entry.from_archive);

    let url = catalog::open_entry(&fp, &fast(), &entry).await.unwrap();
    assert_eq!(url, "https://portal.test/archive");
}

#[tokio::test]
async fn target_above_every_release_is_unavailable() {
    let fp = listing();
    let catalog = catalog::scan(&fp, &fast()).await.unwrap();
    assert_eq!(catalog.highest(), Some(v("2024.2")));

    let err = catalog.resolve(&v("2025.1")).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::VersionUnavailable { target, highest }) => {
            assert_eq!(*target, v("2025.1"));
            assert_eq!(*highest, Some(v("2024.2")));
        }
        other => panic!("expected VersionUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn point_release_target_compares_on_major_minor() {
    let fp = listing();
    let catalog = catalog::scan(&fp, &fast()).await.unwrap();

    // 2021.2.1 is below the highest listed 2024.2, so it resolves to
    // the archive rather than failing a mixed-patch comparison.
    let entry = catalog.resolve(&v("2021.2.1")).unwrap();
    assert!(entry.from_archive);

    // 2026.1.2 projects to 2026.1, above everything.
    let err = catalog.resolve(&v("2026.1.2")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::VersionUnavailable { .. })
    ));
}

#[tokio::test]
async fn empty_listing_reports_unavailable_without_highest() {
    let fp = FakePortal::new("https://portal.test/downloads");
    fp.add_node(NodeSpec::at(portal::VERSION_NAV).text("Loading ..."));
    let catalog = catalog::scan(&fp, &fast()).await.unwrap();

    let err = catalog.resolve(&v("2024.1")).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::VersionUnavailable { highest, .. }) => assert!(highest.is_none()),
        other => panic!("expected VersionUnavailable, got {other:?}"),
    }
}

/// Archive page with one collapsed section for 2021.2.
fn archive_page() -> (FakePortal, usize) {
    let fp = FakePortal::new("https://portal.test/archive");
    let toggle = fp.add_node(
        NodeSpec::at(portal::ARCHIVE_TOGGLES)
            .text(" 2021.2 ")
            .attr("aria-expanded", "false"),
    );
    let region = fp.add_node(NodeSpec::at(portal::EXPANDED_REGION).detached());
    let group = fp.add_node(NodeSpec::at(portal::DOWNLOAD_GROUPS_SCOPED).under(region));
    let link = fp.add_node(
        NodeSpec::at(portal::GROUP_LINKS)
            .under(group)
            .attr("href", "https://portal.test/files/tool-2021.2.tar.gz")
            .attr("data-original-title", "Vivado 2021.2 Full Product"),
    );
    fp.add_node(
        NodeSpec::at(portal::LINK_INFO)
            .under(link)
            .text("(TAR/GZIP - 10 MB)"),
    );
    fp.on_click(
        toggle,
        vec![
            Effect::SetAttr(toggle, "aria-expanded", "true".to_string()),
            Effect::Attach(region),
        ],
    );
    (fp, toggle)
}

#[tokio::test]
async fn archive_expansion_scopes_the_artifact_scan() {
    let (fp, toggle) = archive_page();
    let region = archive::expand(&fp, &fast(), &v("2021.2")).await.unwrap();
    let region = region.expect("matching section should expand");
    assert_eq!(fp.attr(toggle, "aria-expanded").as_deref(), Some("true"));

    let mut console = ScriptedConsole::default();
    let choices = artifact::enumerate(&fp, &mut console, &v("2021.2"), Some(&region))
        .await
        .unwrap();
    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0].title, "Vivado 2021.2 Full Product");
    assert_eq!(choices[0].declared_size, 10_000_000);
}

#[tokio::test]
async fn archive_expansion_without_matching_section_yields_nothing() {
    let (fp, _) = archive_page();
    let region = archive::expand(&fp, &fast(), &v("2019.1")).await.unwrap();
    assert!(region.is_none());
}
