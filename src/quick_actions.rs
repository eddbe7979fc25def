//! Quick-action shortcuts to the data-entry views

/// Destination of a quick action, resolved by the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Headache,
    Prodrome,
    Sleep,
    Stress,
    Medication,
    History,
}

impl Route {
    pub fn title(self) -> &'static str {
        match self {
            Route::Headache => "headache log",
            Route::Prodrome => "prodrome log",
            Route::Sleep => "sleep log",
            Route::Stress => "stress log",
            Route::Medication => "medication log",
            Route::History => "history",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub icon: &'static str,
    pub label: &'static str,
    pub route: Route,
}

pub static QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction { icon: "🤕", label: "Log Headache", route: Route::Headache },
    QuickAction { icon: "⚡", label: "Log Prodrome", route: Route::Prodrome },
    QuickAction { icon: "😴", label: "Log Sleep", route: Route::Sleep },
    QuickAction { icon: "😰", label: "Log Stress", route: Route::Stress },
    QuickAction { icon: "💊", label: "Log Medication", route: Route::Medication },
    QuickAction { icon: "📈", label: "View History", route: Route::History },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_are_ordered_and_unique() {
        assert_eq!(QUICK_ACTIONS[0].route, Route::Headache);
        assert_eq!(QUICK_ACTIONS.last().map(|a| a.route), Some(Route::History));
        let routes: fxhash::FxHashSet<Route> = QUICK_ACTIONS.iter().map(|a| a.route).collect();
        assert_eq!(routes.len(), QUICK_ACTIONS.len());
    }
}
