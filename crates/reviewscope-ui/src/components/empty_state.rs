use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct EmptyStateProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(EmptyState)]
pub(crate) fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <div class="empty-state">
            <p class="empty-title">{props.title.clone()}</p>
            {props.hint.clone().map(|hint| html! {
                <p class="empty-hint">{hint}</p>
            }).unwrap_or_default()}
            { for props.children.iter() }
        </div>
    }
}
