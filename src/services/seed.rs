//! Canned mock data the backend starts with.

use time::macros::datetime;

use crate::types::{ChartColor, ChartData, Conversation, Dashboard, Message, Role, Widget, WidgetKind};

fn msg(id: &str, role: Role, content: &str, timestamp: time::OffsetDateTime) -> Message {
    Message { id: id.into(), content: content.into(), role, timestamp, chart_data: None }
}

#[must_use]
pub fn conversations() -> Vec<Conversation> {
    let mut analysis_reply = msg(
        "3",
        Role::Assistant,
        "I'd be happy to help you analyze your portfolio performance! To provide the most accurate \
         analysis, I'll need some information about your holdings. However, I can show you a sample \
         portfolio performance chart to demonstrate the type of analysis I can provide.",
        datetime!(2024-01-15 10:01:30 UTC),
    );
    analysis_reply.chart_data = Some(ChartData::single(
        &["Jul", "Aug", "Sep", "Oct", "Nov", "Dec"],
        &[100_000.0, 102_500.0, 98_500.0, 105_000.0, 108_500.0, 112_000.0],
        ChartColor::Growth,
    ));

    vec![
        Conversation {
            id: "1".into(),
            title: "Portfolio Analysis".into(),
            created_at: datetime!(2024-01-15 0:00 UTC),
            messages: vec![
                msg(
                    "1",
                    Role::Assistant,
                    "Hello! I'm your AI financial advisor. How can I help you with your investments today?",
                    datetime!(2024-01-15 10:00 UTC),
                ),
                msg(
                    "2",
                    Role::User,
                    "I want to analyze my portfolio performance over the last 6 months",
                    datetime!(2024-01-15 10:01 UTC),
                ),
                analysis_reply,
            ],
        },
        Conversation {
            id: "2".into(),
            title: "Market Trends".into(),
            created_at: datetime!(2024-01-16 0:00 UTC),
            messages: vec![
                msg(
                    "4",
                    Role::User,
                    "What are the current market trends I should be aware of?",
                    datetime!(2024-01-16 14:00 UTC),
                ),
                msg(
                    "5",
                    Role::Assistant,
                    "Here are the key market trends to watch:\n\n\
                     📈 **Tech Sector**: Strong performance in AI and cloud computing stocks\n\
                     📊 **Interest Rates**: Federal Reserve policy impacts on bond yields\n\
                     🏠 **Real Estate**: Housing market showing signs of stabilization\n\
                     💰 **Commodities**: Gold maintaining strength as inflation hedge\n\
                     🌍 **International**: Emerging markets showing resilience\n\n\
                     Would you like me to generate a chart showing sector performance comparison?",
                    datetime!(2024-01-16 14:00:45 UTC),
                ),
            ],
        },
        Conversation {
            id: "3".into(),
            title: "Investment Strategy".into(),
            created_at: datetime!(2024-01-17 0:00 UTC),
            messages: vec![
                msg(
                    "6",
                    Role::User,
                    "Can you help me develop a diversified investment strategy?",
                    datetime!(2024-01-17 9:30 UTC),
                ),
                msg(
                    "7",
                    Role::Assistant,
                    "Absolutely! Here's a balanced diversification strategy:\n\n\
                     🎯 **Asset Allocation**:\n\
                     • 60% Stocks (40% domestic, 20% international)\n\
                     • 30% Bonds (government and corporate)\n\
                     • 10% Alternative investments (REITs, commodities)\n\n\
                     📊 **Risk Management**:\n\
                     • Dollar-cost averaging for regular investments\n\
                     • Rebalancing quarterly\n\
                     • Emergency fund covering 6 months expenses\n\n\
                     ⏰ **Time Horizon**: Adjust allocation based on your investment timeline\n\n\
                     Would you like me to show you a sample allocation chart?",
                    datetime!(2024-01-17 9:31:15 UTC),
                ),
            ],
        },
    ]
}

#[must_use]
pub fn dashboards() -> Vec<Dashboard> {
    vec![
        Dashboard {
            id: "1".into(),
            name: "Investment Portfolio".into(),
            created_at: datetime!(2024-01-15 0:00 UTC),
            widgets: vec![
                Widget {
                    id: "1".into(),
                    title: "Portfolio Value".into(),
                    kind: WidgetKind::Line,
                    data: ChartData::single(
                        &["Jan", "Feb", "Mar", "Apr", "May", "Jun"],
                        &[125_000.0, 132_000.0, 128_500.0, 145_000.0, 158_000.0, 162_000.0],
                        ChartColor::Growth,
                    ),
                },
                Widget {
                    id: "2".into(),
                    title: "Monthly Returns (%)".into(),
                    kind: WidgetKind::Line,
                    data: ChartData::single(&["Q1", "Q2", "Q3", "Q4"], &[5.6, 8.2, -2.1, 12.4], ChartColor::Indigo),
                },
            ],
        },
        Dashboard {
            id: "2".into(),
            name: "Market Analysis".into(),
            created_at: datetime!(2024-01-16 0:00 UTC),
            widgets: vec![Widget {
                id: "3".into(),
                title: "Sector Performance (%)".into(),
                kind: WidgetKind::Line,
                data: ChartData::single(
                    &["Tech", "Healthcare", "Finance", "Energy", "Consumer"],
                    &[15.2, 8.7, 12.3, -3.4, 6.8],
                    ChartColor::Violet,
                ),
            }],
        },
    ]
}
