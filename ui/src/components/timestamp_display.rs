use jiff::Timestamp;
use yew::prelude::*;

use crate::utils::time::{format_local, relative_to};

#[derive(Properties, PartialEq)]
pub struct TimestampDisplayProps {
    pub timestamp: Timestamp,
}

/// "5 minutes ago", with the full local time as a tooltip.
#[function_component]
pub fn TimestampDisplay(props: &TimestampDisplayProps) -> Html {
    let relative = relative_to(props.timestamp, Timestamp::now());
    html! {
        <time
            datetime={props.timestamp.to_string()}
            title={format_local(props.timestamp)}
        >
            {relative}
        </time>
    }
}
