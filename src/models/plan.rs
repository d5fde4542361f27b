use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub action: &'static str,
}

pub fn catalog() -> Vec<Plan> {
    vec![
        Plan {
            id: "basic",
            name: "Basic",
            price: "$25",
            description: "Perfect for individuals or small businesses just getting started with voice assistants.",
            features: &[
                "1 voice assistant",
                "Standard voice quality",
                "Business hours support",
                "Basic analytics",
                "Up to 50 appointments per month",
            ],
            action: "Subscribe Now",
        },
        Plan {
            id: "pro",
            name: "Pro",
            price: "$50",
            description: "Ideal for growing businesses that need multiple assistants with enhanced features.",
            features: &[
                "Up to 5 voice assistants",
                "Premium voice quality",
                "Priority support",
                "Advanced analytics & reporting",
                "Up to 200 appointments per month",
                "Custom voice training",
            ],
            action: "Subscribe Now",
        },
        Plan {
            id: "custom",
            name: "Custom",
            price: "Custom",
            description: "Tailored solutions for large businesses and enterprises with specific requirements.",
            features: &[
                "Unlimited voice assistants",
                "Enterprise-grade voice quality",
                "Dedicated account manager",
                "Full API access",
                "Unlimited appointments",
                "White-label options",
                "Custom integrations",
            ],
            action: "Schedule Consultation",
        },
    ]
}

pub fn find(id: &str) -> Option<Plan> {
    catalog().into_iter().find(|p| p.id == id)
}
