//! Compiled-in default content.
//!
//! This is the document a fresh install shows and the value a reset
//! restores. It must stay complete: every persisted or remote partial is
//! completed from it field by field.

use crate::content::{
    AboutSection, Announcement, Credentials, DisclaimerSection, GeneralSection, HomeSection,
    Maintenance, Post, Service, SiteContent, TeamMember,
};

/// Default admin username
pub const DEFAULT_USERNAME: &str = "ya_team";

/// Default admin password (plaintext; replaced by a hash on first change)
pub const DEFAULT_PASSWORD: &str = "team_ay";

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            general: GeneralSection {
                phone: "+91 44 1234 5678".into(),
                email: "support@yogapaartibanassociates.com".into(),
                address: "Chennai | Madurai | Hyderabad | Bangalore | Delhi | Cochin | Navi Mumbai"
                    .into(),
                tagline: "Legal Mastery Meets Technical Insight".into(),
                hero_image: "https://images.unsplash.com/photo-1497366216548-37526070297c?auto=format&fit=crop&q=80&w=1920".into(),
                accent_color: "#C5A059".into(),
            },
            home: HomeSection {
                hero_title: "YOGAPAARTIBAN ASSOCIATES".into(),
                hero_subtitle: "Excellence in Legal Counsel & Corporate Compliance".into(),
                intro_text: "We provide comprehensive legal solutions with a focus on commercial integrity, technological advancement, and global compliance.".into(),
                maintenance: Maintenance {
                    enabled: false,
                    date: "31/12/2024".into(),
                },
                announcement: Announcement::default(),
            },
            about: default_about(),
            services: default_services(),
            posts: default_posts(),
            disclaimer: DisclaimerSection {
                popup_text: "As per the rules of the Bar Council of India, law firms are not permitted to solicit work and advertise. By clicking the \u{201c}Agree\u{201d} button and accessing this website YOGAPAARTIBAN ASSOCIATES, the user fully accepts that you are seeking information of your own accord and volition and that no form of solicitation has taken place by the Firm or its members.\n\nThe information provided under this website is solely available at your request for information purposes only. It should not be interpreted as soliciting or advertisement. The firm is not liable for any consequence of any action taken by the user relying on material / information provided under this website. In cases where the user has any legal issues, he/she in all cases must seek independent legal advice.".into(),
                footer_text: "This website is for informational purposes only and complies with the rules of the Bar Council of India prohibiting solicitation and advertising. Nothing on this site should be construed as legal advice. Users must seek independent legal counsel for their specific issues.".into(),
            },
            credentials: Credentials {
                username: DEFAULT_USERNAME.into(),
                password: DEFAULT_PASSWORD.into(),
                recovery_code: None,
            },
        }
    }
}

fn member(id: &str, name: &str, role: &str, qualifications: Option<&str>, bio: &str) -> TeamMember {
    TeamMember {
        id: id.into(),
        name: name.into(),
        role: role.into(),
        qualifications: qualifications.map(Into::into),
        bio: bio.into(),
        image: None,
    }
}

fn default_about() -> AboutSection {
    let mut founder = member(
        "founder",
        "Yogapaartiban AP",
        "Founder & Owner",
        Some("B.E., M.S./M.Tech., Ph.D, B.L., ACCA"),
        "Yogapaartiban brings a unique and powerful combination of deep technical understanding and established legal mastery to his practice. He has also completed numerous certifications/diplomas in networking, psychology, forensic accounting, medical compliance, and hospital compliance. With over 10 years of standing experience as a counsel, he has successfully argued cases across various high courts, district courts, the Supreme Court, and specialized tribunals such as DRT, Labour Courts, Commercial Courts, TNPID, and RERA. His expertise includes startup registration, GST compliance, cyber forensics, labour law, and hospital compliance. Before his legal career, he worked in multiple software companies, notably as a Project Manager (Network Specialist) and briefly as a CFO, giving him deep commercial and technological insight beneficial to his clients.",
    );
    founder.image = Some(
        "https://images.unsplash.com/photo-1560250097-0b93528c311a?auto=format&fit=crop&q=80&w=400"
            .into(),
    );

    AboutSection {
        founder,
        executives: vec![
            member(
                "exec1",
                "Rajesh M",
                "Executive Advocate",
                Some("B.A., B.L., M.L. (UK)"),
                "Rajesh is a highly skilled advocate with 12 years of standing experience, representing clients in both civil and criminal matters across high courts and district courts. Rajesh specializes in civil suits, document verification, and registration. His expertise in real estate disputes is strengthened by his family\u{2019}s three generations of experience in the real estate sector.",
            ),
            member(
                "exec2",
                "Yuvaraj Mv",
                "Executive Advocate",
                Some("B.Com., M.B.A., B.L."),
                "Yuvaraj holds 10 years of experience handling civil and criminal matters across multiple courts. His specializations include Motor Vehicle Act cases, PF claims, and Consumer Court litigation. His prior experience in the Food Corporation of India gives him valuable insight into statutory compliance and government operations.",
            ),
            member(
                "exec3",
                "Sathish Kumar S",
                "Executive Advocate",
                Some("B.A., M.A., M.Phil., L.L.B."),
                "With 10 years of standing experience, Sathish has handled civil and criminal matters across high courts and district courts. He specializes in international adjudicating matters and embassy-related legal issues. His experience as a Consulate for Germany at the Indian Embassy gives him deep exposure to diplomatic and international legal procedures.",
            ),
        ],
        cas: vec![
            member(
                "ca1",
                "Harsha Reddy",
                "Chartered Accountant",
                None,
                "A highly competent Chartered Accountant with 5 years of experience in taxation, auditing, financial planning, and compliance. Skilled in preparing financial statements, tax filings, and providing strategic financial advice.",
            ),
            member(
                "ca2",
                "Riaz Mohammed",
                "Chartered Accountant",
                None,
                "A Chartered Accountant with 5 years of experience in statutory audit, tax advisory, and internal controls. Skilled in Tally, SAP, and advanced financial modelling, offering insights that enhance business growth.",
            ),
        ],
        associates_text: "We work with numerous dedicated associates and interns operating across India and abroad, ensuring our clients receive timely and effective representation wherever they are.".into(),
    }
}

fn service(id: &str, title: &str, icon_name: &str, description: &str) -> Service {
    Service {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        icon_name: icon_name.into(),
        video_url: None,
    }
}

fn default_services() -> Vec<Service> {
    let mut gst = service(
        "srv1",
        "GST Services",
        "Calculator",
        "Comprehensive Goods and Services Tax solutions including registration, filing returns, compliance audits, and representation in litigations. We ensure your business adheres to the latest tax regulations.",
    );
    gst.video_url = Some(
        "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4".into(),
    );

    vec![
        gst,
        service(
            "srv2",
            "Startup and Business Support",
            "Rocket",
            "End-to-end support for new ventures, from entity selection (LLP, Pvt Ltd, OPC) to incorporation, obtaining necessary licenses, and ongoing statutory compliance management.",
        ),
        service(
            "srv3",
            "Hospital & Medical Compliance",
            "Stethoscope",
            "Specialized legal services for healthcare institutions covering clinical establishment registration, medical device regulations, and handling medico-legal cases with expert precision.",
        ),
        service(
            "srv4",
            "Immigration Services",
            "Globe",
            "Expert guidance on visa applications, work permits, and citizenship matters. We assist individuals and corporations in navigating complex international immigration laws.",
        ),
        service(
            "srv6",
            "IPR Services",
            "ShieldCheck",
            "Protection of Intellectual Property Rights including trademarks, patents, copyrights, and designs. We handle filing, prosecution, and litigation to safeguard your innovations.",
        ),
        service(
            "srv7",
            "Real Estate Services",
            "Home",
            "Legal assistance in property documentation, title verification, RERA compliance, lease agreements, and dispute resolution for residential and commercial properties.",
        ),
        service(
            "srv8",
            "Export & Import Services",
            "Ship",
            "Advisory on DGFT policies, IEC registration, customs clearance disputes, and international trade contracts to facilitate smooth cross-border commerce.",
        ),
        service(
            "srv9",
            "Banking, NBFC and Fintech",
            "Landmark",
            "Specialized advisory for Banks, NBFCs, and Fintech companies on regulatory compliance, RBI guidelines, loan documentation, and financial dispute resolution.",
        ),
    ]
}

fn default_posts() -> Vec<Post> {
    vec![
        Post {
            id: "p1".into(),
            title: "Understanding GST Compliance for Startups".into(),
            date: "October 15, 2023".into(),
            excerpt: "Navigating the complexities of Goods and Services Tax can be daunting for new businesses. Here is a comprehensive guide to getting started with GST filings and compliance requirements.".into(),
            image: Some("https://images.unsplash.com/photo-1554224155-98406852d009?auto=format&fit=crop&q=80&w=800".into()),
            external_url: Some("#".into()),
        },
        Post {
            id: "p2".into(),
            title: "The Role of Cyber Forensics in Modern Litigation".into(),
            date: "September 22, 2023".into(),
            excerpt: "Digital evidence is becoming central to many legal battles. Learn how cyber forensics is reshaping the courtroom landscape and why digital trail matters in corporate disputes.".into(),
            image: Some("https://images.unsplash.com/photo-1563206767-5b1d972d9fb7?auto=format&fit=crop&q=80&w=800".into()),
            external_url: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let content = SiteContent::default();
        assert!(content.validate().is_empty());
    }

    #[test]
    fn test_default_announcement_is_disabled_and_empty() {
        let content = SiteContent::default();
        assert_eq!(content.home.announcement, Announcement::default());
        assert!(!content.home.announcement.enabled);
    }

    #[test]
    fn test_default_lists() {
        let content = SiteContent::default();
        assert_eq!(content.about.executives.len(), 3);
        assert_eq!(content.about.cas.len(), 2);
        assert_eq!(content.services.len(), 8);
        assert_eq!(content.posts.len(), 2);
        assert!(content.credentials.recovery_code.is_none());
    }
}
