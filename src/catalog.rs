//! Seeded data stores for every screen.
//!
//! The catalog is built once at startup and shared read-only; handlers and
//! pure functions receive it (or slices of it) explicitly.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{
    Author, AuthorProfile, Badge, Category, ConservationEffort, DashboardReport, Discussion,
    DiscussionSummary, EarningRule, Event, EventStatus, GeoPoint, LevelTarget, PollutionReport,
    PollutionSnapshot, PollutionType, Reply, ReportStatus, Reward, RiverHistory, Scheme,
    SchemeScope, Severity, TagCount, UserProfile, WaterQuality,
};

const AVATAR: &str = "/placeholder.svg?height=40&width=40";

// ---

/// In-memory data for the whole application.
#[derive(Debug, Clone)]
pub struct Catalog {
    // ---
    pub reports: Vec<PollutionReport>,
    pub rivers: Vec<RiverHistory>,
    pub categories: Vec<Category>,
    pub recent_discussions: Vec<DiscussionSummary>,
    pub popular_discussions: Vec<DiscussionSummary>,
    pub trending_tags: Vec<TagCount>,
    pub discussions: Vec<Discussion>,
    pub profile: UserProfile,
    pub my_reports: Vec<DashboardReport>,
    pub events: Vec<Event>,
    pub rewards: Vec<Reward>,
    pub earning_rules: Vec<EarningRule>,
    pub schemes: Vec<Scheme>,
}

impl Catalog {
    /// The fixed data set the application ships with.
    pub fn seeded() -> Self {
        // ---
        Self {
            reports: seed_reports(),
            rivers: vec![ganga(), yamuna()],
            categories: seed_categories(),
            recent_discussions: seed_recent(),
            popular_discussions: seed_popular(),
            trending_tags: [
                ("cleanup-drive", 42),
                ("water-quality", 38),
                ("namami-gange", 27),
                ("plastic-pollution", 24),
                ("volunteer", 21),
                ("yamuna", 19),
                ("ganga", 18),
                ("technology", 16),
            ]
            .into_iter()
            .map(|(name, count)| TagCount {
                name: name.to_string(),
                count,
            })
            .collect(),
            discussions: vec![okhla_thread()],
            profile: seed_profile(),
            my_reports: seed_my_reports(),
            events: seed_events(),
            rewards: seed_rewards(),
            earning_rules: seed_earning_rules(),
            schemes: seed_schemes(),
        }
    }

    /// Look up a river by key or display name, ignoring case.
    pub fn river(&self, key: &str) -> Option<&RiverHistory> {
        // ---
        let key = key.trim();
        self.rivers
            .iter()
            .find(|r| r.key.eq_ignore_ascii_case(key) || r.name.eq_ignore_ascii_case(key))
    }

    pub fn discussion(&self, id: u32) -> Option<&Discussion> {
        self.discussions.iter().find(|d| d.id == id)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn report(&self, id: u32) -> Option<&PollutionReport> {
        self.reports.iter().find(|r| r.id == id)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn severity(level: u8) -> Severity {
    Severity::saturating(level.into())
}

#[allow(clippy::too_many_arguments)]
fn report(
    id: u32,
    river: &str,
    location: &str,
    coordinates: (f64, f64),
    pollution_type: PollutionType,
    level: u8,
    date: NaiveDate,
    verified: bool,
    description: &str,
    reported_by: &str,
) -> PollutionReport {
    // ---
    PollutionReport {
        id,
        river: river.into(),
        location: location.into(),
        coordinates: GeoPoint::new(coordinates.0, coordinates.1),
        pollution_type,
        severity: severity(level),
        date,
        verified,
        description: description.into(),
        reported_by: reported_by.into(),
    }
}

fn seed_reports() -> Vec<PollutionReport> {
    // ---
    use PollutionType::*;
    vec![
        report(
            1,
            "Yamuna",
            "Near Wazirabad Barrage, Delhi",
            (28.7158, 77.2309),
            Industrial,
            4,
            ymd(2023, 4, 15),
            true,
            "Heavy industrial discharge with chemical smell and discoloration",
            "Rahul S.",
        ),
        report(
            2,
            "Ganga",
            "Downstream from Kanpur",
            (26.4499, 80.3319),
            Sewage,
            3,
            ymd(2023, 4, 10),
            true,
            "Untreated sewage discharge causing foam formation",
            "Priya M.",
        ),
        report(
            3,
            "Sabarmati",
            "Industrial area, Ahmedabad",
            (23.0225, 72.5714),
            Chemical,
            5,
            ymd(2023, 4, 5),
            false,
            "Severe chemical pollution with dead fish visible",
            "Amit P.",
        ),
        report(
            4,
            "Godavari",
            "Near Nashik",
            (19.9975, 73.7898),
            Plastic,
            2,
            ymd(2023, 4, 20),
            true,
            "Plastic waste accumulation along the riverbank",
            "Sneha K.",
        ),
        report(
            5,
            "Brahmaputra",
            "Guwahati",
            (26.1445, 91.7362),
            Oil,
            4,
            ymd(2023, 4, 8),
            true,
            "Oil spill from nearby industrial unit",
            "Deepak R.",
        ),
    ]
}

fn snapshot(year: i32, level: &str, description: &str) -> PollutionSnapshot {
    PollutionSnapshot {
        year,
        level: level.into(),
        description: description.into(),
    }
}

fn quality(year: i32, ph: f64, bod: f64, dissolved_oxygen: f64, coliform: u32) -> WaterQuality {
    WaterQuality {
        year,
        ph,
        bod,
        dissolved_oxygen,
        coliform,
    }
}

fn effort(year: i32, name: &str, impact: &str) -> ConservationEffort {
    ConservationEffort {
        year,
        name: name.into(),
        impact: impact.into(),
    }
}

fn ganga() -> RiverHistory {
    // ---
    RiverHistory {
        key: "ganga".into(),
        name: "Ganga".into(),
        description: "The Ganges is a trans-boundary river of Asia which flows through India and \
                      Bangladesh. The 2,525 km river rises in the western Himalayas in the Indian \
                      state of Uttarakhand."
            .into(),
        historical_significance: "The Ganges is a sacred river to Hindus and has been so since \
                                  the dawn of their civilization. It has been mentioned in the \
                                  Rigveda, the earliest of the Hindu scriptures, which was \
                                  composed between 1500 and 1200 BCE."
            .into(),
        pollution_history: vec![
            snapshot(
                1970,
                "Low",
                "Limited industrial activity, primarily religious and domestic use",
            ),
            snapshot(1985, "Moderate", "Increasing industrial discharge and urban sewage"),
            snapshot(
                2000,
                "High",
                "Severe pollution from industrial waste, sewage, and religious activities",
            ),
            snapshot(2015, "Very High", "Critical levels of pollution despite cleanup efforts"),
            snapshot(2020, "High", "Some improvement due to Namami Gange Programme"),
        ],
        water_quality: vec![
            quality(1970, 7.5, 1.5, 8.5, 500),
            quality(1985, 7.3, 3.2, 7.1, 5_000),
            quality(2000, 6.8, 5.7, 5.3, 15_000),
            quality(2015, 6.5, 7.2, 4.1, 22_000),
            quality(2020, 6.9, 4.8, 5.8, 12_000),
        ],
        conservation_efforts: vec![
            effort(1985, "Ganga Action Plan Phase I", "Limited"),
            effort(1993, "Ganga Action Plan Phase II", "Moderate"),
            effort(2014, "Namami Gange Programme", "Significant"),
        ],
    }
}

fn yamuna() -> RiverHistory {
    // ---
    RiverHistory {
        key: "yamuna".into(),
        name: "Yamuna".into(),
        description: "The Yamuna is the second largest tributary river of the Ganges and the \
                      longest tributary in India. Originating from the Yamunotri Glacier in the \
                      Himalayas, it flows through several states in North India."
            .into(),
        historical_significance: "The Yamuna is closely linked to the Hindu deity Krishna and has \
                                  been mentioned in ancient Indian texts. The river has played a \
                                  crucial role in the development of the Indo-Gangetic \
                                  civilization."
            .into(),
        pollution_history: vec![
            snapshot(1970, "Low", "Relatively clean with limited urban impact"),
            snapshot(1985, "Moderate", "Growing pollution from Delhi's expansion"),
            snapshot(
                2000,
                "Very High",
                "Severe pollution in Delhi stretch, classified as 'dead river'",
            ),
            snapshot(2015, "Critical", "One of the most polluted rivers in the world"),
            snapshot(2020, "Very High", "Slight improvement in some stretches"),
        ],
        water_quality: vec![
            quality(1970, 7.6, 1.2, 8.8, 600),
            quality(1985, 7.2, 4.5, 6.2, 8_000),
            quality(2000, 6.5, 11.3, 2.1, 100_000),
            quality(2015, 6.3, 16.8, 0.5, 160_000),
            quality(2020, 6.7, 9.6, 2.8, 80_000),
        ],
        conservation_efforts: vec![
            effort(1993, "Yamuna Action Plan Phase I", "Limited"),
            effort(2004, "Yamuna Action Plan Phase II", "Limited"),
            effort(2013, "Yamuna Action Plan Phase III", "Moderate"),
            effort(2018, "Delhi Yamuna Rejuvenation Project", "Ongoing"),
        ],
    }
}

fn seed_categories() -> Vec<Category> {
    // ---
    [
        (
            1,
            "River Pollution Reports",
            "Discuss recent pollution incidents and findings",
            "AlertTriangle",
            42,
        ),
        (2, "Cleanup Events", "Organize and coordinate cleanup activities", "Users", 28),
        (
            3,
            "Water Quality Monitoring",
            "Share water quality data and testing methods",
            "BarChart3",
            35,
        ),
        (4, "Government Initiatives", "Updates on government schemes and policies", "Building", 19),
        (5, "Education & Awareness", "Resources for environmental education", "BookOpen", 31),
        (
            6,
            "Technology & Innovation",
            "Discuss new technologies for river conservation",
            "Lightbulb",
            24,
        ),
    ]
    .into_iter()
    .map(|(id, name, description, icon, threads)| Category {
        id,
        name: name.into(),
        description: description.into(),
        icon: icon.into(),
        threads,
    })
    .collect()
}

#[allow(clippy::too_many_arguments)]
fn summary(
    id: u32,
    title: &str,
    category: &str,
    author: &str,
    replies: u32,
    views: u32,
    last_activity: &str,
    tags: [&str; 3],
) -> DiscussionSummary {
    // ---
    DiscussionSummary {
        id,
        title: title.into(),
        category: category.into(),
        author: Author {
            name: author.into(),
            avatar: AVATAR.into(),
        },
        replies,
        views,
        last_activity: last_activity.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn seed_recent() -> Vec<DiscussionSummary> {
    // ---
    vec![
        summary(
            1,
            "Industrial waste found in Yamuna near Okhla",
            "River Pollution Reports",
            "Rahul Sharma",
            18,
            142,
            "2 hours ago",
            ["yamuna", "industrial-waste", "delhi"],
        ),
        summary(
            2,
            "Organizing a cleanup drive at Juhu Beach this Sunday",
            "Cleanup Events",
            "Priya Patel",
            24,
            210,
            "5 hours ago",
            ["mumbai", "beach-cleanup", "volunteer"],
        ),
        summary(
            3,
            "Water quality testing results from Ganga at Varanasi",
            "Water Quality Monitoring",
            "Dr. Amit Kumar",
            12,
            98,
            "1 day ago",
            ["ganga", "water-quality", "research"],
        ),
        summary(
            4,
            "New Namami Gange project phase announced",
            "Government Initiatives",
            "Sunita Rao",
            9,
            87,
            "2 days ago",
            ["namami-gange", "policy", "funding"],
        ),
        summary(
            5,
            "Innovative plastic waste collection system for rivers",
            "Technology & Innovation",
            "Vikram Mehta",
            31,
            245,
            "3 days ago",
            ["innovation", "plastic-waste", "technology"],
        ),
    ]
}

fn seed_popular() -> Vec<DiscussionSummary> {
    // ---
    vec![
        summary(
            6,
            "Comprehensive guide to water quality testing at home",
            "Water Quality Monitoring",
            "Dr. Meera Iyer",
            76,
            1240,
            "1 week ago",
            ["guide", "water-quality", "diy"],
        ),
        summary(
            7,
            "Success story: How we cleaned up Powai Lake",
            "Cleanup Events",
            "Arjun Nair",
            54,
            890,
            "2 weeks ago",
            ["success-story", "mumbai", "lake"],
        ),
        summary(
            8,
            "Petition: Stricter regulations for industrial waste disposal",
            "Government Initiatives",
            "Anjali Desai",
            128,
            2150,
            "3 days ago",
            ["petition", "industrial-waste", "regulations"],
        ),
        summary(
            9,
            "River conservation curriculum for schools",
            "Education & Awareness",
            "Prof. Suresh Menon",
            42,
            670,
            "5 days ago",
            ["education", "curriculum", "schools"],
        ),
        summary(
            10,
            "Using drones for river pollution monitoring",
            "Technology & Innovation",
            "Karan Malhotra",
            67,
            1120,
            "1 week ago",
            ["drones", "technology", "monitoring"],
        ),
    ]
}

fn profile(name: &str, role: &str, join_date: &str, posts: u32) -> AuthorProfile {
    AuthorProfile {
        name: name.into(),
        avatar: AVATAR.into(),
        role: role.into(),
        join_date: join_date.into(),
        posts,
    }
}

fn okhla_thread() -> Discussion {
    // ---
    let day = ymd(2023, 4, 15);
    Discussion {
        id: 1,
        title: "Industrial waste found in Yamuna near Okhla".into(),
        content: "<p>I was conducting a routine water quality check near the Okhla Barrage \
                  yesterday and found alarming levels of industrial waste being discharged into \
                  the Yamuna River.</p>\
                  <p>The water had a strong chemical smell and unusual coloration. I collected \
                  samples and preliminary testing shows high levels of heavy metals and chemical \
                  compounds typically associated with textile and leather industries.</p>\
                  <p>Has anyone else observed similar issues in this area? I've already reported \
                  this to the local pollution control board, but I think we need to organize a \
                  more thorough investigation and possibly a cleanup effort.</p>"
            .into(),
        category: "River Pollution Reports".into(),
        author: profile("Rahul Sharma", "Water Quality Specialist", "Member since Jan 2022", 48),
        created_at: at(day, 10, 24),
        updated_at: at(day, 11, 30),
        replies: 18,
        views: 142,
        likes: 36,
        tags: ["yamuna", "industrial-waste", "delhi", "water-quality"]
            .iter()
            .map(|t| t.to_string())
            .collect(),
        images: vec![
            "/placeholder.svg?height=300&width=500".into(),
            "/placeholder.svg?height=300&width=500".into(),
        ],
        thread: vec![
            Reply {
                id: 1,
                author: profile(
                    "Dr. Anjali Desai",
                    "Environmental Scientist",
                    "Member since Mar 2021",
                    124,
                ),
                content: "<p>Thank you for reporting this, Rahul. I've been monitoring water \
                          quality in the Yamuna for the past 5 years, and this area has been \
                          problematic due to unauthorized industrial discharge.</p>\
                          <p>I suggest we coordinate with the Delhi Pollution Control Committee \
                          and organize a comprehensive sampling campaign.</p>"
                    .into(),
                created_at: at(day, 11, 45),
                likes: 24,
            },
            Reply {
                id: 2,
                author: profile("Vikram Mehta", "Community Organizer", "Member since Nov 2022", 37),
                content: "<p>I'm part of a local environmental group in Delhi, and we'd be happy \
                          to organize a cleanup drive in this area.</p>\
                          <p>@Rahul - Could you share the exact coordinates of this location?</p>"
                    .into(),
                created_at: at(day, 13, 20),
                likes: 18,
            },
            Reply {
                id: 3,
                author: profile("Priya Sharma", "Journalist", "Member since Feb 2023", 15),
                content: "<p>I'm a journalist covering environmental issues for a national \
                          daily. Would you be willing to share your findings and photos for a \
                          news story?</p>"
                    .into(),
                created_at: at(day, 15, 5),
                likes: 12,
            },
        ],
    }
}

fn seed_profile() -> UserProfile {
    // ---
    let badge = |name: &str, icon: &str, earned_on| Badge {
        name: name.into(),
        icon: icon.into(),
        earned_on,
    };
    UserProfile {
        name: "Priya Sharma".into(),
        username: "priya_eco".into(),
        avatar: "/placeholder.svg?height=100&width=100".into(),
        points: 750,
        level: "River Guardian".into(),
        reports: 12,
        cleanups: 5,
        badges: vec![
            badge("First Report", "CheckCircle", ymd(2023, 1, 15)),
            badge("Cleanup Volunteer", "Users", ymd(2023, 2, 20)),
            badge("Data Contributor", "BarChart3", ymd(2023, 3, 10)),
        ],
        next_level: LevelTarget {
            name: "River Champion".into(),
            points_needed: 1000,
        },
    }
}

fn seed_my_reports() -> Vec<DashboardReport> {
    // ---
    use PollutionType::*;
    use ReportStatus::*;
    [
        (1, "Yamuna", "Near ITO Bridge, Delhi", ymd(2023, 4, 10), Industrial, 4, Verified, 65),
        (2, "Yamuna", "Wazirabad, Delhi", ymd(2023, 3, 25), Sewage, 3, Verified, 55),
        (3, "Ganga", "Haridwar", ymd(2023, 2, 15), Plastic, 2, Verified, 50),
        (4, "Yamuna", "Okhla Barrage", ymd(2023, 1, 30), Chemical, 5, Pending, 0),
    ]
    .into_iter()
    .map(
        |(id, river, location, date, pollution_type, level, status, points)| DashboardReport {
            id,
            river: river.into(),
            location: location.into(),
            date,
            pollution_type,
            severity: severity(level),
            status,
            points,
        },
    )
    .collect()
}

fn seed_events() -> Vec<Event> {
    // ---
    vec![
        Event {
            id: 1,
            name: "Yamuna Cleanup Drive".into(),
            location: "Kalindi Kunj, Delhi".into(),
            date: ymd(2023, 5, 15),
            time: "9:00 AM - 12:00 PM".into(),
            status: EventStatus::Upcoming,
            participants: 45,
            points_earned: None,
        },
        Event {
            id: 2,
            name: "World Water Day Awareness Camp".into(),
            location: "India Gate, Delhi".into(),
            date: ymd(2023, 3, 22),
            time: "10:00 AM - 4:00 PM".into(),
            status: EventStatus::Completed,
            participants: 120,
            points_earned: Some(100),
        },
        Event {
            id: 3,
            name: "Yamuna Biodiversity Survey".into(),
            location: "Sonia Vihar, Delhi".into(),
            date: ymd(2023, 2, 18),
            time: "8:00 AM - 11:00 AM".into(),
            status: EventStatus::Completed,
            participants: 25,
            points_earned: Some(75),
        },
    ]
}

fn seed_rewards() -> Vec<Reward> {
    // ---
    [
        ("RiverGuard T-shirt", "100% organic cotton", 500),
        ("Reusable Water Bottle", "Stainless steel, plastic-free", 350),
        ("Cleanup Kit", "Gloves, bags, and tools", 400),
        ("Leadership Workshop", "Environmental leadership training", 800),
        ("Field Research Trip", "Join scientists in water quality research", 1000),
        ("Conference Pass", "Annual River Conservation Conference", 1200),
    ]
    .into_iter()
    .map(|(name, description, cost)| Reward {
        name: name.into(),
        description: description.into(),
        cost,
    })
    .collect()
}

fn seed_earning_rules() -> Vec<EarningRule> {
    // ---
    [
        ("Submit Reports", "Basic report", 30),
        ("Submit Reports", "With photos", 10),
        ("Submit Reports", "With location data", 15),
        ("Submit Reports", "Verified report bonus", 20),
        ("Join Events", "Cleanup participation", 50),
        ("Join Events", "Awareness event", 30),
        ("Join Events", "Survey/monitoring", 40),
        ("Join Events", "Event organization", 100),
        ("Other Activities", "Refer a friend", 25),
        ("Other Activities", "Share on social media", 10),
        ("Other Activities", "Complete surveys", 15),
        ("Other Activities", "Educational workshop", 35),
    ]
    .into_iter()
    .map(|(group, activity, points)| EarningRule {
        group: group.into(),
        activity: activity.into(),
        points,
    })
    .collect()
}

fn seed_schemes() -> Vec<Scheme> {
    // ---
    use SchemeScope::*;
    [
        (
            "Namami Gange Programme",
            "Integrated Conservation Mission for the Ganga River",
            National,
            "Active",
            "2014 - Present",
            "National Mission for Clean Ganga",
            "₹20,000 Crore",
            Some("https://nmcg.nic.in/"),
        ),
        (
            "National River Conservation Plan",
            "Pollution abatement of rivers across India",
            National,
            "Active",
            "1995 - Present",
            "National River Conservation Directorate",
            "34 Rivers in 16 States",
            None,
        ),
        (
            "Yamuna Action Plan (Delhi)",
            "Restoration of Yamuna River in Delhi NCR",
            State,
            "Active",
            "1993 - Present (Phase III ongoing)",
            "Delhi Jal Board",
            "22 km stretch in Delhi",
            None,
        ),
        (
            "Maharashtra River Restoration Program",
            "Comprehensive river restoration in Maharashtra",
            State,
            "Active",
            "2018 - Present",
            "Maharashtra Water Resources Department",
            "Mithi, Godavari, Krishna, Tapi",
            None,
        ),
        (
            "Mula-Mutha River Cleanup (Pune)",
            "Community-led initiative for Pune's rivers",
            Local,
            "Active",
            "2017 - Present",
            "Pune Municipal Corporation & NGOs",
            "5,000+ citizens",
            None,
        ),
        (
            "Sabarmati Riverfront Development (Ahmedabad)",
            "Urban river restoration and development",
            Local,
            "Ongoing",
            "2005 - Present",
            "Sabarmati Riverfront Development Corporation",
            "11.5 km stretch",
            None,
        ),
    ]
    .into_iter()
    .map(
        |(name, summary, scope, status, timeline, agency, scale, website)| Scheme {
            name: name.into(),
            summary: summary.into(),
            scope,
            status: status.into(),
            timeline: timeline.into(),
            agency: agency.into(),
            scale: scale.into(),
            website: website.map(String::from),
        },
    )
    .collect()
}
