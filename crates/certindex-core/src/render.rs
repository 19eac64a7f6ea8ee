//! HTML templates for the certificate index

use chrono::{DateTime, SecondsFormat};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::certificate::CertificateResult;

pub const PAGE_TITLE: &str = "Certificates";

/// A group heading and the certificates that were processed successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub name: String,
    pub description: Option<String>,
    pub deprecated: bool,
    pub certificates: Vec<CertificateResult>,
}

// ============================================================================
// Layout
// ============================================================================

pub fn render_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style {
                    (PreEscaped(r#"
                        body { font-family: system-ui; max-width: 960px; margin: 40px auto; padding: 0 20px; color: #212529; }
                        h1 { font-weight: 600; }
                        h2 { font-weight: 600; margin-top: 40px; border-bottom: 2px solid #dee2e6; padding-bottom: 6px; }
                        .group-description { color: #495057; }
                        .certificate { border: 1px solid #dee2e6; border-radius: 6px; padding: 16px 20px; margin: 16px 0; }
                        .certificate h3 { margin: 0 0 8px; }
                        .deprecated { opacity: 0.65; }
                        .badge { display: inline-block; background: #842029; color: #ffffff; border-radius: 4px; padding: 2px 8px; font-size: 12px; font-weight: 600; vertical-align: middle; margin-left: 8px; }
                        dl { display: grid; grid-template-columns: max-content 1fr; gap: 4px 16px; margin: 12px 0; }
                        dt { font-weight: 600; }
                        dd { margin: 0; }
                        code { font-size: 13px; word-break: break-all; }
                        .empty { color: #6c757d; font-style: italic; }
                        a.download { color: #0056b3; font-weight: 600; text-decoration: none; }
                        a.download:hover { text-decoration: underline; }
                    "#))
                }
            }
            body {
                (content)
            }
        }
    }
}

// ============================================================================
// Components
// ============================================================================

fn deprecated_badge(deprecated: bool) -> Markup {
    html! {
        @if deprecated {
            span class="badge" { "Deprecated" }
        }
    }
}

pub fn render_certificate(cert: &CertificateResult) -> Markup {
    let datetime = DateTime::from_timestamp(cert.expiry_timestamp, 0)
        .map(|expiry| expiry.to_rfc3339_opts(SecondsFormat::Secs, true));

    html! {
        div.certificate.deprecated[cert.deprecated] {
            h3 {
                (cert.name)
                (deprecated_badge(cert.deprecated))
            }
            @if let Some(description) = &cert.description {
                p class="description" { (description) }
            }
            dl {
                dt { "Expires" }
                dd {
                    time datetime=[datetime] data-timestamp=(cert.expiry_timestamp) { (cert.expiry) " UTC" }
                }
                dt { "SHA-256" }
                dd { code { (cert.sha256) } }
                dt { "SHA-1" }
                dd { code { (cert.sha1) } }
                dt { "MD5" }
                dd { code { (cert.md5) } }
            }
            a class="download" href=(cert.file) download { "Download" }
        }
    }
}

fn render_certificates(certificates: &[CertificateResult]) -> Markup {
    html! {
        @if certificates.is_empty() {
            p class="empty" { "No certificates available." }
        }
        @for cert in certificates {
            (render_certificate(cert))
        }
    }
}

pub fn render_group(group: &GroupView) -> Markup {
    html! {
        section.group.deprecated[group.deprecated] {
            h2 {
                (group.name)
                (deprecated_badge(group.deprecated))
            }
            @if let Some(description) = &group.description {
                p class="group-description" { (description) }
            }
            (render_certificates(&group.certificates))
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Index with one section per group, in the order given
pub fn render_index(groups: &[GroupView]) -> Markup {
    render_layout(
        PAGE_TITLE,
        html! {
            h1 { (PAGE_TITLE) }
            @for group in groups {
                (render_group(group))
            }
        },
    )
}

/// Index without group headings
pub fn render_flat_index(certificates: &[CertificateResult]) -> Markup {
    render_layout(
        PAGE_TITLE,
        html! {
            h1 { (PAGE_TITLE) }
            (render_certificates(certificates))
        },
    )
}
