use crate::core::logic::scatter_style;
use reviewscope_report::PositionPoint;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ScatterProps {
    pub points: Vec<PositionPoint>,
}

/// Positioning map: each point is absolutely placed inside a relative box.
#[function_component(Scatter)]
pub(crate) fn scatter(props: &ScatterProps) -> Html {
    html! {
        <div class="scatter" style="position:relative;height:320px">
            { for props.points.iter().map(|point| html! {
                <div class={classes!("scatter-point", point.own.then_some("own"))}
                    style={scatter_style(point)} title={point.label.clone()}>
                    <span>{point.label.clone()}</span>
                </div>
            }) }
        </div>
    }
}
