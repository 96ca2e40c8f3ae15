use crate::config::AnimatorConfig;
use crate::logging::{log_event, LogLevel};
use crate::page::{
    active_section, closes_menu_on_click, closes_menu_on_resize, navbar_background,
    scroll_target_top, MenuState, RevealStyle, SectionBounds, Throttle, ThrottleDecision,
    REVEAL_HIDDEN, REVEAL_ROOT_MARGIN, REVEAL_SHOWN, REVEAL_THRESHOLD, REVEAL_TRANSITION,
    SCROLL_THROTTLE_MS,
};
use crate::web_loop::WebTypingLoop;
use js_sys::{Array, Date};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, Node, ScrollBehavior, ScrollToOptions,
};
use yew::prelude::*;

const TYPED_TEXT_ID: &str = "typed-text";
const NAV_LINKS: [(&str, &str); 5] = [
    ("home", "Home"),
    ("about", "About"),
    ("projects", "Projects"),
    ("skills", "Skills"),
    ("contact", "Contact"),
];

fn document() -> Option<Document> {
    window()?.document()
}

fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0)
}

fn smooth_scroll_to(top: f64) {
    let Some(win) = window() else {
        return;
    };

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&options);
}

/// Scrolls to `#section_id` below the navbar. Returns false when the
/// section does not exist.
fn scroll_to_section(section_id: &str) -> bool {
    let Some(document) = document() else {
        return false;
    };
    let Some(section) = document
        .get_element_by_id(section_id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return false;
    };

    let navbar_height = document
        .query_selector(".navbar")
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .map(|navbar| f64::from(navbar.offset_height()))
        .unwrap_or(0.0);

    smooth_scroll_to(scroll_target_top(f64::from(section.offset_top()), navbar_height));
    true
}

fn section_elements(selector: &str) -> Vec<HtmlElement> {
    let Some(nodes) = document().and_then(|d| d.query_selector_all(selector).ok()) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn section_bounds() -> Vec<SectionBounds> {
    section_elements("section[id]")
        .into_iter()
        .map(|section| SectionBounds {
            id: section.id(),
            top: f64::from(section.offset_top()),
            height: f64::from(section.offset_height()),
        })
        .collect()
}

fn apply_reveal_style(element: &HtmlElement, style: RevealStyle) {
    let css = element.style();
    let _ = css.set_property("opacity", style.opacity);
    let _ = css.set_property("transform", style.transform);
}

fn update_scroll_dependent(navbar: &NodeRef, active: &UseStateHandle<Option<String>>) {
    let scroll_y = scroll_y();

    if let Some(navbar) = navbar.cast::<HtmlElement>() {
        let _ = navbar
            .style()
            .set_property("background-color", navbar_background(scroll_y));
    }

    let sections = section_bounds();
    if let Some(section_id) = active_section(scroll_y, &sections) {
        active.set(Some(section_id.to_string()));
    }
}

fn node_contains(container: &NodeRef, target: Option<&Node>) -> bool {
    container
        .cast::<Node>()
        .map(|node| node.contains(target))
        .unwrap_or(false)
}

#[derive(Properties, PartialEq)]
struct NavLinkProps {
    target: AttrValue,
    label: AttrValue,
    active: bool,
    on_navigate: Callback<AttrValue>,
}

#[function_component(NavLink)]
fn nav_link(props: &NavLinkProps) -> Html {
    let onclick = {
        let target = props.target.clone();
        let on_navigate = props.on_navigate.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            on_navigate.emit(target.clone());
        })
    };

    html! {
        <li class="nav-item">
            <a
                class={classes!("nav-link", props.active.then_some("active"))}
                href={format!("#{}", props.target)}
                onclick={onclick}
            >
                {props.label.clone()}
            </a>
        </li>
    }
}

#[function_component(App)]
fn app() -> Html {
    let menu = use_state_eq(MenuState::default);
    let active = use_state_eq(|| None::<String>);
    let navbar_ref = use_node_ref();
    let toggle_ref = use_node_ref();
    let menu_ref = use_node_ref();

    {
        use_effect_with((), move |_| {
            let config = AnimatorConfig::default();
            let typing = match WebTypingLoop::start(&config, TYPED_TEXT_ID) {
                Ok(typing) => Some(typing),
                Err(error) => {
                    log_event(
                        config.log_level,
                        LogLevel::Info,
                        "typing_animator_unavailable",
                        serde_json::json!({ "error": error.to_string() }),
                    );
                    None
                }
            };

            move || {
                if let Some(typing) = typing {
                    typing.stop();
                }
            }
        });
    }

    {
        let navbar_ref = navbar_ref.clone();
        let active = active.clone();
        use_effect_with((), move |_| {
            update_scroll_dependent(&navbar_ref, &active);

            let throttle = Rc::new(RefCell::new(Throttle::new(SCROLL_THROTTLE_MS)));
            let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                let decision = throttle.borrow_mut().on_event(Date::now());
                match decision {
                    ThrottleDecision::RunNow => update_scroll_dependent(&navbar_ref, &active),
                    ThrottleDecision::RunAfter(wait_ms) => {
                        let throttle = throttle.clone();
                        let navbar_ref = navbar_ref.clone();
                        let active = active.clone();
                        let trailing = Closure::once_into_js(move || {
                            throttle.borrow_mut().on_trailing_run(Date::now());
                            update_scroll_dependent(&navbar_ref, &active);
                        });
                        if let Some(win) = window() {
                            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                                trailing.unchecked_ref(),
                                wait_ms.ceil() as i32,
                            );
                        }
                    }
                    ThrottleDecision::Coalesce => {}
                }
            });

            if let Some(win) = window() {
                let _ = win.add_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref());
            }

            move || {
                if let Some(win) = window() {
                    let _ = win
                        .remove_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref());
                }
            }
        });
    }

    {
        let menu = menu.clone();
        let toggle_ref = toggle_ref.clone();
        let menu_ref = menu_ref.clone();
        use_effect_with((), move |_| {
            let on_document_click = {
                let menu = menu.clone();
                Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                    let target = event.target().and_then(|target| target.dyn_into::<Node>().ok());
                    let inside_toggle = node_contains(&toggle_ref, target.as_ref());
                    let inside_menu = node_contains(&menu_ref, target.as_ref());

                    if closes_menu_on_click(inside_toggle, inside_menu) {
                        menu.set(MenuState::closed());
                    }
                })
            };
            let on_resize = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                if closes_menu_on_resize(viewport_width()) {
                    menu.set(MenuState::closed());
                }
            });

            let document = document();
            let win = window();
            if let Some(document) = document.as_ref() {
                let _ = document
                    .add_event_listener_with_callback("click", on_document_click.as_ref().unchecked_ref());
            }
            if let Some(win) = win.as_ref() {
                let _ = win.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
            }

            move || {
                if let Some(document) = document {
                    let _ = document.remove_event_listener_with_callback(
                        "click",
                        on_document_click.as_ref().unchecked_ref(),
                    );
                }
                if let Some(win) = win {
                    let _ = win
                        .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
                }
            }
        });
    }

    use_effect_with((), move |_| {
        let sections = section_elements("section");
        let on_intersect = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    if let Ok(target) = entry.target().dyn_into::<HtmlElement>() {
                        apply_reveal_style(&target, REVEAL_SHOWN);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        options.set_root_margin(REVEAL_ROOT_MARGIN);
        let observer =
            IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options).ok();

        if let Some(observer) = observer.as_ref() {
            for section in &sections {
                apply_reveal_style(section, REVEAL_HIDDEN);
                let _ = section.style().set_property("transition", REVEAL_TRANSITION);
                observer.observe(section);
            }
        }

        move || {
            if let Some(observer) = observer {
                observer.disconnect();
            }
            drop(on_intersect);
        }
    });

    let on_navigate = {
        let menu = menu.clone();
        Callback::from(move |target: AttrValue| {
            if scroll_to_section(&target) {
                menu.set(MenuState::closed());
            }
        })
    };

    let on_logo = Callback::from(|event: MouseEvent| {
        event.prevent_default();
        smooth_scroll_to(0.0);
    });

    let on_toggle_menu = {
        let menu = menu.clone();
        Callback::from(move |_: MouseEvent| menu.set((*menu).toggled()))
    };

    let on_hero_cta = on_navigate.reform(|event: MouseEvent| {
        event.prevent_default();
        AttrValue::from("projects")
    });

    let menu_open = menu.is_open();
    let active_id = (*active).clone();

    html! {
        <>
            <nav class="navbar" id="navbar" ref={navbar_ref}>
                <div class="nav-container">
                    <div class="nav-logo">
                        <a href="#home" onclick={on_logo}>{"Portfolio"}</a>
                    </div>
                    <ul class={classes!("nav-menu", menu_open.then_some("active"))} id="nav-menu" ref={menu_ref}>
                        { for NAV_LINKS.iter().map(|(target, label)| html! {
                            <NavLink
                                target={*target}
                                label={*label}
                                active={active_id.as_deref() == Some(*target)}
                                on_navigate={on_navigate.clone()}
                            />
                        }) }
                    </ul>
                    <div
                        class={classes!("hamburger", menu_open.then_some("active"))}
                        id="mobile-menu"
                        ref={toggle_ref}
                        onclick={on_toggle_menu}
                    >
                        <span class="bar"></span>
                        <span class="bar"></span>
                        <span class="bar"></span>
                    </div>
                </div>
            </nav>

            <main>
                <section id="home" class="hero">
                    <div class="hero-content">
                        <h1 class="hero-title">{"Hi, I'm a developer"}</h1>
                        <p class="hero-subtitle">
                            <span id={TYPED_TEXT_ID}></span>
                            <span class="cursor" aria-hidden="true">{"|"}</span>
                        </p>
                        <a class="btn btn-primary" href="#projects" onclick={on_hero_cta}>{"View my work"}</a>
                    </div>
                </section>

                <section id="about" class="about">
                    <h2 class="section-title">{"About"}</h2>
                    <p>
                        {"I build dependable software across the stack, from browser interfaces to the services behind them."}
                    </p>
                </section>

                <section id="projects" class="projects">
                    <h2 class="section-title">{"Projects"}</h2>
                    <ul class="project-list">
                        <li class="project-card">
                            <h3>{"Portfolio site"}</h3>
                            <p>{"This page, written in Rust and compiled to WebAssembly."}</p>
                        </li>
                        <li class="project-card">
                            <h3>{"Terminal typer"}</h3>
                            <p>{"The same typing animation driven by tokio timers in a terminal."}</p>
                        </li>
                    </ul>
                </section>

                <section id="skills" class="skills">
                    <h2 class="section-title">{"Skills"}</h2>
                    <ul class="skill-list">
                        <li>{"Rust"}</li>
                        <li>{"TypeScript"}</li>
                        <li>{"SQL"}</li>
                        <li>{"HTML & CSS"}</li>
                    </ul>
                </section>

                <section id="contact" class="contact">
                    <h2 class="section-title">{"Contact"}</h2>
                    <p>{"Reach out through any of the links in the footer."}</p>
                </section>
            </main>
        </>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        document()
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
