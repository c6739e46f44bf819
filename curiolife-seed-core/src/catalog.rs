//! Keyed nested content for known seed records.
//!
//! Devotionals are matched by exact title, prayers and studies by exact slug.
//! A miss yields an empty slice.

use std::collections::HashMap;

use crate::components::{PrayerStep, ScriptureReference, StudySession};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    scripture_by_title: HashMap<String, Vec<ScriptureReference>>,
    steps_by_slug: HashMap<String, Vec<PrayerStep>>,
    sessions_by_slug: HashMap<String, Vec<StudySession>>,
}

impl Catalog {
    /// An empty catalog: every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scripture(mut self, title: &str, refs: Vec<ScriptureReference>) -> Self {
        self.scripture_by_title.insert(title.to_string(), refs);
        self
    }

    pub fn with_steps(mut self, slug: &str, steps: Vec<PrayerStep>) -> Self {
        self.steps_by_slug.insert(slug.to_string(), steps);
        self
    }

    pub fn with_sessions(mut self, slug: &str, sessions: Vec<StudySession>) -> Self {
        self.sessions_by_slug.insert(slug.to_string(), sessions);
        self
    }

    pub fn scripture_for(&self, title: &str) -> &[ScriptureReference] {
        self.scripture_by_title
            .get(title)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn steps_for(&self, slug: &str) -> &[PrayerStep] {
        self.steps_by_slug
            .get(slug)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn sessions_for(&self, slug: &str) -> &[StudySession] {
        self.sessions_by_slug
            .get(slug)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The nested content bundled with the CurioLife seed dataset.
    pub fn builtin() -> Self {
        Self::new()
            .with_scripture(
                "Finding Peace in Prayer",
                vec![ScriptureReference::niv("Philippians", 4, 6, 7)],
            )
            .with_scripture(
                "The Power of Gratitude",
                vec![ScriptureReference::niv("1 Thessalonians", 5, 16, 18)],
            )
            .with_scripture(
                "Strength for the Weary",
                vec![ScriptureReference::niv("Isaiah", 40, 31, 31)],
            )
            .with_steps("morning-centering-prayer", morning_centering_steps())
            .with_steps("evening-examen-prayer", evening_examen_steps())
            .with_sessions("prayer-101-7-day-journey", prayer_101_sessions())
            .with_sessions("psalms-prayers-of-the-heart", psalms_sessions())
    }
}

fn step(order: u32, title: &str, instruction: &str, duration: u32) -> PrayerStep {
    PrayerStep {
        title: title.to_string(),
        instruction: instruction.to_string(),
        duration,
        order,
    }
}

fn session(
    order: u32,
    title: &str,
    description: &str,
    content: &str,
    estimated_minutes: u32,
    scripture: Option<ScriptureReference>,
) -> StudySession {
    StudySession {
        title: title.to_string(),
        description: description.to_string(),
        content: content.to_string(),
        order,
        estimated_minutes: Some(estimated_minutes),
        scripture_references: scripture.map(|r| vec![r]),
    }
}

fn morning_centering_steps() -> Vec<PrayerStep> {
    vec![
        step(1, "Arrive and Breathe", "Take three slow, deep breaths. With each exhale, release tension from your body. Arrive fully in this moment.", 2),
        step(2, "Acknowledge God's Presence", "Silently or aloud, say: 'God, You are here with me now.' Notice His presence surrounding you.", 1),
        step(3, "Offer Your Day", "Present your day to God: your schedule, your concerns, your hopes. Ask Him to guide your steps.", 3),
        step(4, "Listen", "In silence, simply be with God. If thoughts arise, gently return your attention to His presence.", 4),
        step(5, "Close with Gratitude", "Thank God for meeting you in this moment. Carry this awareness of His presence into your day.", 1),
    ]
}

fn evening_examen_steps() -> Vec<PrayerStep> {
    vec![
        step(1, "Become Aware of God's Presence", "Begin by acknowledging that God is with you now, and has been with you throughout this day.", 1),
        step(2, "Review the Day with Gratitude", "Walk through your day hour by hour. For what moment today are you most grateful? Give thanks to God for that gift.", 4),
        step(3, "Pay Attention to Your Emotions", "Notice the feelings that arose today. What brought you joy? What caused you stress? Share these honestly with God.", 3),
        step(4, "Choose One Feature of the Day", "Select one moment where you felt particularly close to or distant from God. Reflect on that experience with Him.", 3),
        step(5, "Look Toward Tomorrow", "Ask God to guide you tomorrow. What do you need from Him? How can you serve Him better?", 2),
        step(6, "Rest in God's Love", "End by resting in God's unconditional love for you. Release the day into His hands.", 2),
    ]
}

fn prayer_101_sessions() -> Vec<StudySession> {
    vec![
        session(
            1,
            "Day 1: What is Prayer?",
            "Understanding the biblical foundation of prayer as conversation with God",
            "<p>Prayer is fundamentally about relationship. It's not a formula or ritual—it's conversation with the living God who loves you and desires to know you.</p><p>In this session, we'll explore what prayer is (and isn't), examine Jesus' teaching on prayer, and begin to see prayer as natural conversation rather than formal duty.</p>",
            15,
            Some(ScriptureReference::niv("Matthew", 6, 5, 15)),
        ),
        session(
            2,
            "Day 2: The Lord's Prayer as Template",
            "Learning from Jesus' model prayer",
            "<p>When the disciples asked Jesus to teach them to pray, He gave them what we now call the Lord's Prayer—not as mere words to recite, but as a template for all prayer.</p><p>Today we'll unpack this prayer phrase by phrase, discovering how it addresses adoration, provision, forgiveness, and protection.</p>",
            20,
            Some(ScriptureReference::niv("Matthew", 6, 9, 13)),
        ),
        session(
            3,
            "Day 3: Adoration and Praise",
            "Beginning prayer by focusing on who God is",
            "<p>We often rush immediately to our requests, but biblical prayer begins with adoration—acknowledging who God is before asking for what we need.</p><p>Adoration reorients our perspective, reminding us of God's character, power, and love. It shifts our focus from our problems to His greatness.</p>",
            15,
            Some(ScriptureReference::niv("Psalm", 103, 1, 5)),
        ),
        session(
            4,
            "Day 4: Confession and Repentance",
            "The freedom of honest confession before God",
            "<p>Confession isn't about groveling or earning God's love—it's about honesty that leads to freedom. 1 John 1:9 promises that when we confess our sins, God is faithful to forgive and cleanse us.</p><p>Today we'll explore how confession deepens intimacy with God and breaks the power of shame.</p>",
            20,
            Some(ScriptureReference::niv("1 John", 1, 9, 9)),
        ),
        session(
            5,
            "Day 5: Thanksgiving",
            "Cultivating gratitude in prayer",
            "<p>Thanksgiving transforms our prayer life and our perspective. When we bring our requests with thanksgiving (Philippians 4:6), we remember God's past faithfulness even as we ask for present help.</p><p>Today we'll practice thanksgiving prayer and explore how gratitude changes us.</p>",
            15,
            Some(ScriptureReference::niv("Philippians", 4, 6, 7)),
        ),
        session(
            6,
            "Day 6: Supplication (Asking)",
            "Bringing our requests boldly before God",
            "<p>God invites us to ask. 'Ask and it will be given to you; seek and you will find; knock and the door will be opened to you' (Matthew 7:7). Prayer isn't about changing God's mind, but aligning our hearts with His will.</p><p>We'll explore how to pray bold prayers while trusting God's wisdom and timing.</p>",
            20,
            Some(ScriptureReference::niv("Matthew", 7, 7, 11)),
        ),
        session(
            7,
            "Day 7: Building a Prayer Rhythm",
            "Creating a sustainable daily prayer practice",
            "<p>Prayer isn't just for crisis moments—it's meant to be the rhythm of our daily lives. 'Pray continually,' Paul writes (1 Thessalonians 5:17).</p><p>On this final day, we'll create a personalized prayer plan that fits your life and personality, establishing rhythms that will sustain you beyond this week.</p>",
            25,
            Some(ScriptureReference::niv("1 Thessalonians", 5, 16, 18)),
        ),
    ]
}

fn psalms_sessions() -> Vec<StudySession> {
    vec![
        session(
            1,
            "Day 1: Introduction to the Psalms",
            "Understanding the Psalms as Israel's prayer book",
            "<p>The Psalms are God's gift to us—150 prayers that teach us to pray with our whole hearts. They're honest, emotional, and beautifully human, yet inspired by God's Spirit.</p>",
            15,
            None,
        ),
        session(
            2,
            "Day 2: Psalms of Lament",
            "Learning to bring our pain to God",
            "<p>Nearly one-third of the Psalms are laments—honest cries to God in pain. Psalm 13 shows us it's okay to ask 'How long, O Lord?' God can handle our questions and our tears.</p>",
            20,
            None,
        ),
        session(
            3,
            "Day 3: Psalms of Thanksgiving",
            "Celebrating God's goodness and faithfulness",
            "<p>Psalm 107 overflows with thanksgiving: 'Give thanks to the Lord, for he is good; his love endures forever.' Thanksgiving psalms teach us to remember and celebrate God's past faithfulness.</p>",
            15,
            None,
        ),
    ]
}
