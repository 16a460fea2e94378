use shared::chat::DayLabel;
use yew::{Html, Properties, function_component, html};

#[derive(Properties, PartialEq, Clone)]
pub struct DaySeparatorProps {
    pub label: DayLabel,
}

#[function_component(DaySeparator)]
pub fn day_separator(props: &DaySeparatorProps) -> Html {
    html! {
        <div class="divider text-xs text-base-content/60">
            { props.label.to_string() }
        </div>
    }
}
