//! Default card sets each page mounts with before any layout is saved.

use intraextra_core::AppResult;

use crate::{
    Field, FieldKind, FieldList, GridCell, GridSpan, Role, RoleSet, Section, SectionAccess,
};

struct CardSeed {
    id: &'static str,
    title: &'static str,
    at: (u32, u32),
    span: (u32, u32),
    financial: bool,
    fields: &'static [FieldSeed],
}

struct FieldSeed {
    id: &'static str,
    kind: SeedKind,
    label: &'static str,
    readonly: bool,
}

enum SeedKind {
    Text,
    Number,
    Date,
    Address,
    Url,
    Dropdown(&'static [&'static str]),
}

const fn card(
    id: &'static str,
    title: &'static str,
    at: (u32, u32),
    span: (u32, u32),
    fields: &'static [FieldSeed],
) -> CardSeed {
    CardSeed {
        id,
        title,
        at,
        span,
        financial: false,
        fields,
    }
}

const fn financial_card(
    id: &'static str,
    title: &'static str,
    at: (u32, u32),
    span: (u32, u32),
    fields: &'static [FieldSeed],
) -> CardSeed {
    CardSeed {
        id,
        title,
        at,
        span,
        financial: true,
        fields,
    }
}

const fn input(id: &'static str, kind: SeedKind, label: &'static str) -> FieldSeed {
    FieldSeed {
        id,
        kind,
        label,
        readonly: false,
    }
}

const fn locked(id: &'static str, kind: SeedKind, label: &'static str) -> FieldSeed {
    FieldSeed {
        id,
        kind,
        label,
        readonly: true,
    }
}

const PROJECT_CORE_INFO: &[CardSeed] = &[
    card(
        "project-info",
        "Project Information",
        (1, 1),
        (8, 5),
        &[
            locked("f1", SeedKind::Text, "Project ID"),
            input("f2", SeedKind::Text, "Event Name"),
            input(
                "f3",
                SeedKind::Dropdown(&["Full Service", "Equipment Only", "Consulting"]),
                "Project Type",
            ),
            input(
                "f4",
                SeedKind::Dropdown(&["Active", "Planning", "Complete", "On Hold"]),
                "Status",
            ),
        ],
    ),
    card(
        "client-info",
        "Client Information",
        (10, 1),
        (8, 5),
        &[
            input("c1", SeedKind::Text, "Primary Contact"),
            input("c2", SeedKind::Text, "Email"),
            input("c3", SeedKind::Text, "Phone"),
            input("c4", SeedKind::Address, "Venue Location"),
        ],
    ),
    card(
        "back-office",
        "Back-Office Connections",
        (19, 1),
        (6, 5),
        &[
            input("b1", SeedKind::Url, "SharePoint Folder"),
            input("b2", SeedKind::Url, "Jira Project"),
            input("b3", SeedKind::Url, "JUE Dashboard"),
        ],
    ),
    card(
        "config-settings",
        "Configuration Settings",
        (26, 1),
        (6, 5),
        &[
            input("cfg1", SeedKind::Dropdown(&["NFC", "UHF", "LF"]), "RFID Type"),
            input("cfg2", SeedKind::Dropdown(&["GBP", "EUR", "USD"]), "Currency"),
            input("cfg3", SeedKind::Number, "Top-up Limit"),
        ],
    ),
    card(
        "cashless-info",
        "Cashless Information",
        (1, 7),
        (8, 5),
        &[
            input("cash1", SeedKind::Dropdown(&["Yes", "No"]), "Cashless Enabled"),
            input("cash2", SeedKind::Number, "Top-up Points"),
        ],
    ),
    card(
        "refund-info",
        "Refund Information",
        (10, 7),
        (8, 5),
        &[
            input("ref1", SeedKind::Number, "Refund Window (days)"),
            input(
                "ref2",
                SeedKind::Dropdown(&["Original Payment", "Bank Transfer", "Cash"]),
                "Refund Method",
            ),
        ],
    ),
    card(
        "key-dates",
        "Key Dates",
        (19, 7),
        (6, 5),
        &[
            input("d1", SeedKind::Date, "Event Start"),
            input("d2", SeedKind::Date, "Event End"),
            input("d3", SeedKind::Date, "Build Start"),
            input("d4", SeedKind::Date, "Delivery Deadline"),
        ],
    ),
    card(
        "summary",
        "Summary Overview",
        (26, 7),
        (6, 5),
        &[
            input("s1", SeedKind::Number, "Devices"),
            input("s2", SeedKind::Number, "Readers"),
            input("s3", SeedKind::Number, "Capacity"),
            input("s4", SeedKind::Number, "Top-ups"),
        ],
    ),
    card(
        "delivery-deadlines",
        "Delivery & Deadlines",
        (1, 13),
        (8, 5),
        &[
            input("del1", SeedKind::Date, "Equipment Delivery"),
            input("del2", SeedKind::Date, "Setup Complete"),
            input("del3", SeedKind::Date, "On-Site Arrival"),
        ],
    ),
    financial_card(
        "fees-overview",
        "Fees Overview",
        (10, 13),
        (8, 5),
        &[
            input("fee1", SeedKind::Number, "Base Fee"),
            input("fee2", SeedKind::Number, "Device Fee"),
            input("fee3", SeedKind::Number, "Service Fee"),
            locked("fee4", SeedKind::Number, "Total Value"),
        ],
    ),
];

const OPERATIONS_PIPELINE: &[CardSeed] = &[
    card("phase-tracker", "Phase Tracker", (1, 1), (12, 4), &[]),
    card("critical-tasks", "Critical Tasks", (14, 1), (10, 6), &[]),
    card("resource-allocation", "Resource Allocation", (25, 1), (8, 6), &[]),
    card("timeline", "Project Timeline", (1, 6), (12, 5), &[]),
];

const CREW_MANAGEMENT: &[CardSeed] = &[
    card("crew-roster", "Crew Roster", (1, 1), (15, 8), &[]),
    financial_card("crew-costs", "Crew Costs", (17, 1), (8, 4), &[]),
    card("availability", "Availability Calendar", (17, 6), (8, 4), &[]),
];

const ROI_ANALYSIS: &[CardSeed] = &[
    financial_card("revenue-streams", "Revenue Streams", (1, 1), (10, 6), &[]),
    financial_card("cost-breakdown", "Cost Breakdown", (12, 1), (10, 6), &[]),
    financial_card("profitability", "Profitability Analysis", (23, 1), (10, 6), &[]),
];

const LOGISTICS: &[CardSeed] = &[
    card("equipment-requests", "Equipment Requests", (1, 1), (12, 5), &[]),
    card("site-map", "Site Map", (14, 1), (12, 8), &[]),
    card("shipping-schedule", "Shipping Schedule", (1, 7), (12, 5), &[]),
];

/// Page ids that ship with a default card set.
pub const CATALOG_PAGE_IDS: &[&str] = &[
    "project-core-info",
    "operations-pipeline",
    "crew-management",
    "roi-analysis",
    "logistics",
];

/// Returns the default cards for a page, or an empty list for pages without
/// a catalog entry.
pub fn default_sections(page_id: &str) -> AppResult<Vec<Section>> {
    let seeds = match page_id {
        "project-core-info" => PROJECT_CORE_INFO,
        "operations-pipeline" => OPERATIONS_PIPELINE,
        "crew-management" => CREW_MANAGEMENT,
        "roi-analysis" => ROI_ANALYSIS,
        "logistics" => LOGISTICS,
        _ => return Ok(Vec::new()),
    };

    seeds.iter().map(build_section).collect()
}

fn build_section(seed: &CardSeed) -> AppResult<Section> {
    let fields = seed
        .fields
        .iter()
        .map(build_field)
        .collect::<AppResult<Vec<_>>>()?;

    let access = if seed.financial {
        let readers: RoleSet = [Role::Master, Role::Senior, Role::HrFinance]
            .into_iter()
            .collect();
        SectionAccess::Financial {
            allowed_roles: Some(readers),
        }
    } else {
        SectionAccess::Open
    };

    Section::new(
        seed.id,
        seed.title,
        seed.id,
        GridCell::new(seed.at.0, seed.at.1),
        GridSpan::new(seed.span.0, seed.span.1),
        access,
        FieldList::new(fields)?,
    )
}

fn build_field(seed: &FieldSeed) -> AppResult<Field> {
    let kind = match seed.kind {
        SeedKind::Text => FieldKind::Text,
        SeedKind::Number => FieldKind::Number,
        SeedKind::Date => FieldKind::Date,
        SeedKind::Address => FieldKind::Address,
        SeedKind::Url => FieldKind::Url,
        SeedKind::Dropdown(options) => FieldKind::Dropdown {
            options: options.iter().map(|option| (*option).to_owned()).collect(),
        },
    };

    Field::new(seed.id, seed.label, kind, false, seed.readonly)
}

#[cfg(test)]
mod tests {
    use super::{CATALOG_PAGE_IDS, default_sections};
    use crate::GridDimensions;

    #[test]
    fn every_catalog_page_builds_and_fits_the_default_grid() {
        for page_id in CATALOG_PAGE_IDS {
            let sections = default_sections(page_id);
            assert!(sections.is_ok(), "{page_id} failed to build");
            let sections = sections.unwrap_or_default();
            assert!(!sections.is_empty());
            assert!(
                sections
                    .iter()
                    .all(|section| !section.overflows_grid(GridDimensions::default()))
            );
        }
    }

    #[test]
    fn unknown_page_has_no_defaults() {
        assert!(default_sections("guards-module").unwrap_or_default().is_empty());
    }

    #[test]
    fn fees_overview_is_financial() {
        let sections = default_sections("project-core-info").unwrap_or_default();
        let fees = sections
            .iter()
            .find(|section| section.id().as_str() == "fees-overview");
        assert!(fees.is_some_and(|section| section.access().is_financial()));
    }
}
