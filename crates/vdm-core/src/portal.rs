//! Selectors and markers for the vendor download portal.
//!
//! All portal layout knowledge lives here; the workflow modules only use
//! these names. Public so integration fixtures can register matching
//! nodes.

/// Landing page listing the flat version catalog.
pub const DEFAULT_PORTAL_URL: &str =
    "https://www.xilinx.com/support/download/index.html/content/xilinx/en/downloadNav/vivado-design-tools.html";

/// Anchors in the left-hand version navigation, one per catalog entry.
pub const VERSION_NAV: &str =
    r#"//div[contains(@class, "tabs-left")]/ul[contains(@class, "nav")]/descendant::a"#;

/// Label of the catch-all archive entry (matched case-insensitively).
pub const ARCHIVE_LABEL: &str = "vivado archive";

/// Collapse toggles on the archive page, one per archived version.
pub const ARCHIVE_TOGGLES: &str = r#"//button[contains(@data-toggle, "collapse")]"#;

/// The region revealed once an archive toggle reports itself expanded.
pub const EXPANDED_REGION: &str = r#"//div[contains(@id, "collapse") and @aria-expanded="true"]"#;

/// Download groups on a version page (absolute) and inside an expanded
/// archive region (relative).
pub const DOWNLOAD_GROUPS: &str = r#"//div[contains(@class, "xilinxDCDownloadGroup")]"#;
pub const DOWNLOAD_GROUPS_SCOPED: &str =
    r#"descendant::div[contains(@class, "xilinxDCDownloadGroup")]"#;

/// Optional header and alert description inside a download group.
pub const GROUP_HEADER: &str = r#"descendant::div[@class="row"]/div/h2"#;
pub const GROUP_ALERT: &str = r#"descendant::div[@class="row"]/descendant::div[@class="alert"]"#;

/// Candidate download anchors inside a group.
pub const GROUP_LINKS: &str = r#"descendant::li[@class="download-links"]/descendant::a[not(@class)]"#;

/// Size/info span adjacent to a download anchor.
pub const LINK_INFO: &str = r#"parent::p/child::span[contains(@class, "subdued")]"#;

/// Links whose URL carries this marker go through the member download
/// form regardless of version string.
pub const MEMBER_FORM_MARKER: &str = "member/forms/download";

/// Substring of the post-click URL that indicates a login redirect.
pub const LOGIN_MARKER: &str = "login";

pub const LOGIN_EMAIL: &str = r#"//input[@name="identifier"]"#;
pub const LOGIN_PASSWORD: &str = r#"//input[@type="password"]"#;
pub const LOGIN_SUBMIT: &str = r#"//input[@type="submit"]"#;
pub const LOGIN_ERROR: &str =
    r#"//div[contains(@class, "error") or contains(@class, "Error") or contains(@class, "ERROR")]"#;

/// Member download form controls, keyed by the portal's field names.
pub const FIELD_FIRST_NAME: &str = r#"//input[@name="First_Name"]"#;
pub const FIELD_LAST_NAME: &str = r#"//input[@name="Last_Name"]"#;
pub const FIELD_COMPANY: &str = r#"//input[@name="Company"]"#;
pub const FIELD_ADDRESS_1: &str = r#"//input[@name="Address_1"]"#;
pub const FIELD_ADDRESS_2: &str = r#"//input[@name="Address_2"]"#;
pub const FIELD_COUNTRY: &str = r#"//select[@name="Country"]"#;
pub const FIELD_STATE: &str = r#"//input[@name="State"]"#;
pub const FIELD_CITY: &str = r#"//input[@name="City"]"#;
pub const FIELD_ZIP: &str = r#"//input[@name="Zip_Code"]"#;
pub const FIELD_PHONE: &str = r#"//input[@name="Phone"]"#;
pub const FIELD_JOB_FUNCTION: &str = r#"//select[@name="Job_Function"]"#;

/// Some countries replace the free-text state input with an enabled
/// select once a location is chosen.
pub const STATE_SELECT_PROBE: &str = r#"//select[@name="State" and not(@disabled)]"#;

/// Options of a select control, relative to the select node.
pub const SELECT_OPTIONS: &str = "./option";

pub const FORM_SUBMIT: &str = r#"//button[@type="SUBMIT" or @type="submit" or @type="Submit"]"#;
pub const FORM_FILENAME: &str = r#"//input[@name="filename" and @type="hidden"]"#;
pub const FORM_ERROR: &str =
    r#"//div[contains(@id, "Error") or contains(@id, "error") or contains(@id, "ERROR")]"#;
