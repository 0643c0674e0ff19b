//! Document metadata and back-matter built from the configuration

use chrono::{DateTime, FixedOffset, Local};

use crate::core::config::Config;
use crate::oscal::model::{
    Address, BackMatter, Link, Metadata, Party, Property, Resource, ResponsibleParty, Rlink, Role,
    OSCAL_VERSION,
};

/// Roles the configured party is responsible for
const ROLES: &[(&str, &str)] = &[
    ("publisher", "Source document converter to OSCAL."),
    ("author", "Source document author."),
    ("contact", "Contact."),
];

/// Current local time, the timestamp used for freshly converted documents
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Metadata for documents of the given EUCS version
pub fn metadata(config: &Config, version: &str, timestamp: DateTime<FixedOffset>) -> Metadata {
    let party = &config.party;

    Metadata {
        title: config.title.clone(),
        published: timestamp,
        last_modified: timestamp,
        version: version.to_string(),
        oscal_version: OSCAL_VERSION.to_string(),
        props: vec![Property::new("keywords", &config.keywords)],
        links: vec![Link {
            href: config.source.uuid.clone(),
            rel: Some("alternate".to_string()),
        }],
        roles: ROLES
            .iter()
            .map(|(id, title)| Role {
                id: id.to_string(),
                title: title.to_string(),
            })
            .collect(),
        parties: vec![Party {
            uuid: party.uuid.clone(),
            party_type: "organization".to_string(),
            name: party.name.clone(),
            email_addresses: vec![party.email.clone()],
            addresses: vec![Address {
                addr_lines: party.address.clone(),
                city: Some(party.city.clone()),
                country: Some(party.country.clone()),
            }],
        }],
        responsible_parties: ROLES
            .iter()
            .map(|(id, _)| ResponsibleParty {
                role_id: id.to_string(),
                party_uuids: vec![party.uuid.clone()],
            })
            .collect(),
        remarks: Some(config.remarks.clone()).filter(|r| !r.is_empty()),
    }
}

/// Back-matter pointing at the source publication
pub fn back_matter(config: &Config) -> BackMatter {
    let source = &config.source;

    BackMatter {
        resources: vec![Resource {
            uuid: source.uuid.clone(),
            title: Some(source.title.clone()),
            rlinks: vec![Rlink {
                href: source.href.clone(),
                media_type: Some("application/pdf".to_string()),
            }],
        }],
    }
}
