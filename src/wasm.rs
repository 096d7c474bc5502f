use std::time::Duration;

use crate::catalog::LessonList;
use crate::dispatcher::{CAPTURE_FILE_STEM, FAILURE_MESSAGE, KEYBOARD_HINT, SUCCESS_MESSAGE};
use crate::germ_buster::Phase;
use crate::lessons::StepCursor;
use crate::math_game::Feedback;
use crate::profile::KIT_ITEMS;
use crate::storage::BrowserStore;
use crate::voice::VOICE_HINT;
use crate::{
    AppContext, CatalogManifest, Confetti, Direction, Dispatcher, DispatcherEvent,
    DispatcherInput, DisplayMode, Effect, GameConfig, GameKind, GermBuster, KeyValueStore,
    LabTab, LessonCatalog, MemoryStore, PickResult, ProfileField, QuizSession, Route, RunStatus,
    RunTicket, SafetyProfile, SortResult, Splat, StepEvent, StorageError, Tick, VoiceCommand,
    parse_voice_command,
};
use gloo_net::http::Request;
use js_sys::Reflect;
use leptos::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

const CAPTURE_TARGET: &str = "game-content";
const LAB_CONTAINER: &str = "game-container";

/// `localStorage` when the browser allows it, otherwise an in-memory map so
/// the app still works in private windows.
#[derive(Debug)]
enum PageStore {
    Browser(BrowserStore),
    Memory(MemoryStore),
}

impl PageStore {
    fn open() -> Self {
        match BrowserStore::open() {
            Ok(store) => PageStore::Browser(store),
            Err(error) => {
                tracing::warn!(%error, "falling back to in-memory storage");
                PageStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for PageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            PageStore::Browser(store) => store.get(key),
            PageStore::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            PageStore::Browser(store) => store.set(key, value),
            PageStore::Memory(store) => store.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match self {
            PageStore::Browser(store) => store.remove(key),
            PageStore::Memory(store) => store.remove(key),
        }
    }
}

type Ctx = StoredValue<AppContext<PageStore>>;

fn rng() -> StdRng {
    StdRng::from_entropy()
}

fn set_body_theme(theme: &str) {
    if let Some(document) = leptos::window().document() {
        if let Some(body) = document.body() {
            let _ = body.set_attribute("data-theme", theme);
        }
    }
}

fn current_route() -> Option<Route> {
    let hash = leptos::window().location().hash().unwrap_or_default();
    let path = hash.trim_start_matches('#');
    Route::from_path(if path.is_empty() { "/" } else { path })
}

fn href(route: &Route) -> String {
    format!("#{}", route.path())
}

fn navigate(route: &Route) {
    let _ = leptos::window().location().set_hash(&route.path());
}

fn speak(text: &str) {
    let Ok(synth) = leptos::window().speech_synthesis() else {
        return;
    };
    if let Ok(utterance) = web_sys::SpeechSynthesisUtterance::new_with_text(text) {
        synth.cancel();
        synth.speak(&utterance);
    }
}

fn confetti_available() -> Option<js_sys::Function> {
    let global = js_sys::global();
    Reflect::get(&global, &JsValue::from_str("confetti"))
        .ok()
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
}

fn confetti_options(burst: &Confetti) -> js_sys::Object {
    let options = js_sys::Object::new();
    let origin = js_sys::Object::new();
    let _ = Reflect::set(
        &origin,
        &JsValue::from_str("y"),
        &JsValue::from_f64(f64::from(burst.origin_y)),
    );
    if let Some(x) = burst.origin_x {
        let _ = Reflect::set(&origin, &JsValue::from_str("x"), &JsValue::from_f64(f64::from(x)));
    }

    let _ = Reflect::set(
        &options,
        &JsValue::from_str("particleCount"),
        &JsValue::from_f64(f64::from(burst.particle_count)),
    );
    let _ = Reflect::set(
        &options,
        &JsValue::from_str("spread"),
        &JsValue::from_f64(f64::from(burst.spread)),
    );
    let _ = Reflect::set(&options, &JsValue::from_str("origin"), &origin);
    if !burst.colors.is_empty() {
        let colors: js_sys::Array = burst
            .colors
            .iter()
            .map(|color| JsValue::from_str(color))
            .collect();
        let _ = Reflect::set(&options, &JsValue::from_str("colors"), &colors);
    }

    options
}

fn celebrate(burst: &Confetti) {
    if let Some(fire) = confetti_available() {
        let _ = fire.call1(&js_sys::global(), &confetti_options(burst));
    }
}

#[wasm_bindgen(inline_js = r#"
export function captureElement(elementId, fileName) {
    const capture = globalThis.html2canvas;
    const element = document.getElementById(elementId);
    if (typeof capture !== 'function' || !element) {
        return Promise.resolve(false);
    }

    return capture(element).then((canvas) => {
        const link = document.createElement('a');
        link.download = fileName;
        link.href = canvas.toDataURL();
        link.click();
        return true;
    });
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = captureElement)]
    fn capture_element(element_id: &str, file_name: &str) -> js_sys::Promise;
}

fn capture_view(file_stem: &str) {
    let file_name = format!("{file_stem}-{}.png", js_sys::Date::now() as u64);
    let promise = capture_element(CAPTURE_TARGET, &file_name);

    spawn_local(async move {
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(saved) if saved.as_bool() == Some(true) => {
                speak("Screenshot saved! Great work!");
            }
            Ok(_) => {}
            Err(error) => tracing::warn!(?error, "screen capture failed"),
        }
    });
}

#[wasm_bindgen(inline_js = r#"
export function listenForSpeech(onTranscript) {
    const Recognition = globalThis.SpeechRecognition || globalThis.webkitSpeechRecognition;
    if (typeof Recognition !== 'function') {
        return null;
    }

    const recognition = new Recognition();
    recognition.continuous = true;
    recognition.interimResults = false;
    recognition.lang = 'en-US';
    recognition.onresult = (event) => {
        const results = event.results;
        onTranscript(results[results.length - 1][0].transcript);
    };

    try {
        recognition.start();
    } catch (error) {
        console.error('Speech recognition start failed', error);
        return null;
    }
    return recognition;
}

export function stopListening(recognition) {
    if (recognition) {
        recognition.onresult = null;
        recognition.stop();
    }
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = listenForSpeech)]
    fn listen_for_speech(on_transcript: &Closure<dyn FnMut(String)>) -> JsValue;

    #[wasm_bindgen(js_name = stopListening)]
    fn stop_listening(recognition: &JsValue);
}

fn toggle_fullscreen() {
    let Some(document) = leptos::window().document() else {
        return;
    };
    if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
        return;
    }
    if let Some(container) = document.get_element_by_id(LAB_CONTAINER) {
        if let Err(error) = container.request_fullscreen() {
            tracing::warn!(?error, "fullscreen request failed");
        }
    }
}

fn perform(effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Celebrate(burst) => celebrate(&burst),
            Effect::Speak(text) => speak(&text),
            Effect::Capture { file_stem, after } => {
                set_timeout(move || capture_view(&file_stem), after);
            }
        }
    }
}

async fn fetch_catalog() -> Result<LessonCatalog, String> {
    let manifest = Request::get("lessons/index.json")
        .send()
        .await
        .map_err(|error| error.to_string())?
        .json::<CatalogManifest>()
        .await
        .map_err(|error| error.to_string())?;

    let mut lists = Vec::new();
    for leaf in manifest.leaves() {
        let list = Request::get(&leaf.file)
            .send()
            .await
            .map_err(|error| error.to_string())?
            .json::<LessonList>()
            .await
            .map_err(|error| error.to_string())?;
        lists.push((leaf, list));
    }

    LessonCatalog::from_lists(lists).map_err(|error| error.to_string())
}

#[component]
fn SpeakButton(text: String) -> impl IntoView {
    view! {
        <button type="button" class="pill speak" aria-label="Read aloud" on:click=move |_| speak(&text)>
            "🔊"
        </button>
    }
}

#[component]
fn Navbar(mode: ReadSignal<DisplayMode>, set_mode: WriteSignal<DisplayMode>) -> impl IntoView {
    let links = [
        (Route::Dashboard, "Home"),
        (Route::Lessons, "Lessons"),
        (Route::Quiz, "Quiz"),
        (Route::Games, "Games"),
        (Route::Kit, "My Kit"),
        (Route::Profile, "Profile"),
        (Route::FindHelp, "Find Help"),
    ];

    view! {
        <header class="page-header">
            <a class="brand" href=href(&Route::Dashboard)>"HealthHub"</a>
            <nav class="nav-links">
                {links
                    .into_iter()
                    .map(|(route, label)| view! { <a class="nav-link" href=href(&route)>{label}</a> })
                    .collect_view()}
            </nav>
            <button class="pill" on:click=move |_| set_mode.update(|current| *current = current.next())>
                {move || mode.get().label()}
            </button>
        </header>
    }
}

#[component]
fn Footer() -> impl IntoView {
    view! {
        <footer class="page-footer">
            <p>"In an emergency, always tell a grown-up and call 911 or 112."</p>
            <a href=href(&Route::About)>"About HealthHub"</a>
        </footer>
    }
}

#[component]
fn LoginPage() -> impl IntoView {
    let (name, set_name) = create_signal(String::new());

    view! {
        <main class="page login">
            <h1 class="headline">"Welcome to HealthHub"</h1>
            <p class="lede">"Learn first aid with games, stories and quizzes."</p>
            <input
                class="text-input"
                placeholder="What is your name?"
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <button
                class="primary"
                on:click=move |_| {
                    let greeting = name.get();
                    if !greeting.trim().is_empty() {
                        speak(&format!("Hello {}!", greeting.trim()));
                    }
                    navigate(&Route::Dashboard);
                }
            >
                "Let's go!"
            </button>
        </main>
    }
}

#[component]
fn DashboardPage(catalog: RwSignal<LessonCatalog>) -> impl IntoView {
    let stats = move || catalog.with(|catalog| catalog.stats());
    let chart = move || {
        catalog.with(|catalog| {
            catalog
                .lessons()
                .map(|lesson| {
                    let width = format!("width: {}%; background: {}", lesson.steps.len() * 20, lesson.color);
                    view! {
                        <div class="chart-row">
                            <span class="chart-label">{lesson.short_title()}</span>
                            <span class="chart-bar" style=width></span>
                        </div>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <main class="page dashboard">
            <h1 class="headline">"Your Dashboard"</h1>
            <section class="status-panel">
                <div class="status-item">
                    <p class="label">"Lessons"</p>
                    <p class="value">{move || stats().lessons}</p>
                </div>
                <div class="status-item">
                    <p class="label">"Steps to learn"</p>
                    <p class="value">{move || stats().steps}</p>
                </div>
                <div class="status-item">
                    <p class="label">"Video lessons"</p>
                    <p class="value">{move || stats().with_video}</p>
                </div>
            </section>
            <section class="chart">{chart}</section>
            <section class="card-grid">
                <a class="card" href=href(&Route::Lessons)>"📚 Lessons"</a>
                <a class="card" href=href(&Route::Quiz)>"❓ Quiz"</a>
                <a class="card" href=href(&Route::Games)>"🎮 Games"</a>
                <a class="card" href=href(&Route::Kit)>"🧰 My Kit"</a>
                <a class="card" href=href(&Route::Profile)>"🪪 Safety Profile"</a>
            </section>
        </main>
    }
}

#[component]
fn LessonsPage(catalog: RwSignal<LessonCatalog>) -> impl IntoView {
    let cards = move || {
        catalog.with(|catalog| {
            catalog
                .entries()
                .iter()
                .map(|entry| {
                    let lesson = &entry.lesson;
                    let style = format!("border-color: {}", lesson.color);
                    let topic = (!entry.categories.is_empty())
                        .then(|| view! { <p class="eyebrow">{entry.category_path()}</p> });
                    view! {
                        <a class="card lesson-card" style=style href=href(&Route::Lesson(lesson.id.clone()))>
                            {topic}
                            {lesson.cover.clone().map(|cover| view! { <img src=cover alt="" /> })}
                            <h2>{lesson.title.clone()}</h2>
                        </a>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <main class="page">
            <h1 class="headline">"First Aid Lessons"</h1>
            <section class="card-grid">{cards}</section>
        </main>
    }
}

#[component]
fn LessonPage(catalog: RwSignal<LessonCatalog>, id: String) -> impl IntoView {
    let found = catalog.with(|catalog| catalog.find(&id).cloned());
    let lesson = match found {
        Ok(lesson) => lesson,
        Err(error) => {
            return view! {
                <main class="page">
                    <section class="error-card">
                        <p class="error-body">{error.to_string()}</p>
                        <a href=href(&Route::Lessons)>"Back to lessons"</a>
                    </section>
                </main>
            }
            .into_view();
        }
    };

    let (cursor, set_cursor) = create_signal(StepCursor::new(&lesson));
    let step_lesson = store_value(lesson.clone());
    let step = move || step_lesson.with_value(|lesson| cursor.get().current(lesson).cloned());
    let total = lesson.steps.len();

    let video = lesson.video_id.clone().map(|video_id| {
        view! {
            <iframe
                class="lesson-video"
                src=format!("https://www.youtube.com/embed/{video_id}")
                title="Lesson video"
                allowfullscreen=true
            ></iframe>
        }
    });
    let warnings = lesson
        .warnings
        .iter()
        .map(|warning| view! { <li class="warning">"⚠️ " {warning.clone()}</li> })
        .collect_view();

    view! {
        <main class="page lesson">
            <h1 class="headline" style=format!("color: {}", lesson.color)>{lesson.title.clone()}</h1>
            {video}
            {move || {
                step()
                    .map(|step| {
                        view! {
                            <section class="lesson-step">
                                <img src=step.image.clone() alt=step.text.clone() />
                                <p class="step-text">{step.text.clone()}</p>
                                <SpeakButton text=step.audio.clone() />
                            </section>
                        }
                    })
            }}
            <div class="step-nav">
                <button
                    class="pill"
                    disabled=move || cursor.get().is_first()
                    on:click=move |_| set_cursor.update(|cursor| {
                        cursor.previous();
                    })
                >
                    "Back"
                </button>
                <span class="step-count">
                    {move || format!("Step {} of {}", cursor.get().index() + 1, total)}
                </span>
                <button
                    class="primary"
                    disabled=move || cursor.get().is_last()
                    on:click=move |_| set_cursor.update(|cursor| {
                        cursor.next();
                    })
                >
                    "Next"
                </button>
            </div>
            <ul class="warnings">{warnings}</ul>
        </main>
    }
    .into_view()
}

#[component]
fn QuizPage(ctx: Ctx) -> impl IntoView {
    let feedback_delay =
        ctx.with_value(|ctx| Duration::from_millis(ctx.config().quiz.feedback_delay_ms));
    let (error, set_error) = create_signal::<Option<String>>(None);
    let session = create_rw_signal::<Option<QuizSession>>(None);

    let restart = move || match ctx.with_value(|ctx| ctx.quiz(&mut rng())) {
        Ok(fresh) => {
            set_error.set(None);
            session.set(Some(fresh));
        }
        Err(message) => {
            session.set(None);
            set_error.set(Some(message.to_string()));
        }
    };
    restart();

    let answer = move |option: usize| {
        let result = session.try_update(|session| session.as_mut().map(|quiz| quiz.answer(option)));
        let Some(Some(Ok(feedback))) = result else {
            return;
        };
        speak(if feedback.correct { "Correct!" } else { "Not quite." });

        set_timeout(
            move || {
                session.update(|session| {
                    if let Some(quiz) = session.as_mut() {
                        let _ = quiz.advance();
                    }
                });
            },
            feedback_delay,
        );
    };

    let body = move || {
        if let Some(message) = error.get() {
            return view! { <section class="error-card"><p class="error-body">{message}</p></section> }
                .into_view();
        }

        session.with(|session| {
            let Some(quiz) = session else {
                return ().into_view();
            };

            if quiz.is_finished() {
                let summary = quiz.summary();
                return view! {
                    <section class="quiz-card">
                        <h2>{summary.clone()}</h2>
                        <SpeakButton text=summary />
                        <button class="primary" on:click=move |_| restart()>"Play Again"</button>
                    </section>
                }
                .into_view();
            }

            let Some(question) = quiz.current() else {
                return ().into_view();
            };
            let answered = quiz.answered();
            let progress = format!("Question {} of {}", quiz.position() + 1, quiz.len());

            view! {
                <section class="quiz-card">
                    <p class="eyebrow">{progress}</p>
                    <div class="prompt-area">
                        <p class="prompt">{question.prompt.clone()}</p>
                        <SpeakButton text=question.audio.clone() />
                    </div>
                    <div class="options-grid">
                        {question
                            .options
                            .iter()
                            .enumerate()
                            .map(|(index, option)| {
                                let status = match answered {
                                    Some(feedback) if index == feedback.correct_index => "option correct",
                                    Some(_) => "option distractor",
                                    None => "option",
                                };
                                view! {
                                    <button
                                        class=status
                                        disabled=answered.is_some()
                                        on:click=move |_| answer(index)
                                    >
                                        <span class="option-index">{(index + 1).to_string()}</span>
                                        <span class="option-body">{option.clone()}</span>
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                </section>
            }
            .into_view()
        })
    };

    view! {
        <main class="page">
            <h1 class="headline">"Safety Quiz"</h1>
            {body}
        </main>
    }
}

#[component]
fn FindHelpPage() -> impl IntoView {
    let intro = "If you or someone else is hurt, find a grown-up and call for help.";

    view! {
        <main class="page">
            <h1 class="headline">"Find Help"</h1>
            <div class="prompt-area">
                <p class="lede">{intro}</p>
                <SpeakButton text=intro.to_string() />
            </div>
            <section class="card-grid">
                <a class="card emergency" href="tel:911">"📞 Call 911"</a>
                <a class="card emergency" href="tel:112">"📞 Call 112"</a>
                <a class="card" href="https://www.openstreetmap.org/search?query=hospital" target="_blank">
                    "🏥 Hospitals near me"
                </a>
            </section>
        </main>
    }
}

#[component]
fn ProfileInput(
    label: &'static str,
    field: ProfileField,
    value: Signal<String>,
    profile: RwSignal<SafetyProfile>,
) -> impl IntoView {
    view! {
        <label class="form-row">
            <span class="label">{label}</span>
            <input
                class="text-input"
                prop:value=move || value.get()
                on:input=move |ev| profile.update(|profile| profile.set(field, event_target_value(&ev)))
            />
        </label>
    }
}

#[component]
fn ProfilePage(ctx: Ctx) -> impl IntoView {
    let loaded = ctx
        .with_value(|ctx| ctx.load_profile())
        .unwrap_or_else(|error| {
            tracing::warn!(%error, "could not load saved profile");
            SafetyProfile::default()
        });
    let profile = create_rw_signal(loaded);
    let (status, set_status) = create_signal::<Option<String>>(None);

    let save = move |_| {
        let current = profile.get();
        let result = ctx.try_update_value(|ctx| ctx.save_profile(&current));
        let message = match result {
            Some(Ok(())) => "Profile saved!".to_string(),
            Some(Err(error)) => error.to_string(),
            None => "Profile could not be saved.".to_string(),
        };
        set_status.set(Some(message));
    };

    view! {
        <main class="page">
            <h1 class="headline">"My Safety Profile"</h1>
            <section class="form-card">
                <ProfileInput
                    label="My name"
                    field=ProfileField::Name
                    value=Signal::derive(move || profile.with(|profile| profile.name.clone()))
                    profile=profile
                />
                <ProfileInput
                    label="Grown-up to call"
                    field=ProfileField::Contact
                    value=Signal::derive(move || profile.with(|profile| profile.contact.clone()))
                    profile=profile
                />
                <ProfileInput
                    label="Things that upset me"
                    field=ProfileField::Triggers
                    value=Signal::derive(move || profile.with(|profile| profile.triggers.clone()))
                    profile=profile
                />
                <ProfileInput
                    label="Things that calm me"
                    field=ProfileField::Calming
                    value=Signal::derive(move || profile.with(|profile| profile.calming.clone()))
                    profile=profile
                />
                <button class="primary" on:click=save>"Save"</button>
                {move || status.get().map(|message| view! { <p class="status">{message}</p> })}
            </section>
        </main>
    }
}

#[component]
fn KitPage(ctx: Ctx) -> impl IntoView {
    let loaded = ctx.with_value(|ctx| ctx.load_kit()).unwrap_or_else(|error| {
        tracing::warn!(%error, "could not load kit checklist");
        Default::default()
    });
    let kit = create_rw_signal(loaded);

    let toggle = move |id: &'static str| {
        match ctx.try_update_value(|ctx| ctx.toggle_kit_item(id)) {
            Some(Ok(updated)) => {
                let complete = updated.is_complete();
                kit.set(updated);
                if complete {
                    celebrate(&Confetti::level_cleared());
                    speak("Your first aid kit is ready!");
                }
            }
            Some(Err(error)) => tracing::warn!(%error, "could not save kit checklist"),
            None => {}
        }
    };

    view! {
        <main class="page">
            <h1 class="headline">"Build Your First Aid Kit"</h1>
            <div class="progress">
                <span
                    class="progress-bar"
                    style=move || format!("width: {}%", kit.with(|kit| kit.progress_percent()))
                ></span>
            </div>
            <ul class="kit-list">
                {KIT_ITEMS
                    .iter()
                    .map(|item| {
                        let id = item.id;
                        view! {
                            <li>
                                <button
                                    class=move || {
                                        if kit.with(|kit| kit.is_checked(id)) { "kit-item checked" } else { "kit-item" }
                                    }
                                    on:click=move |_| toggle(id)
                                >
                                    <span class="icon">{item.icon}</span>
                                    <span>{item.name}</span>
                                </button>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </main>
    }
}

#[component]
fn SortingGame(ctx: Ctx) -> impl IntoView {
    let puzzle = create_rw_signal(ctx.with_value(|ctx| ctx.sorting_puzzle()));

    let drop_into = move |bin: &'static str| {
        match puzzle.try_update(|puzzle| puzzle.drop_into(bin)) {
            Some(SortResult::Placed { effects, .. }) | Some(SortResult::Mismatch { effects }) => {
                perform(effects)
            }
            Some(SortResult::NothingSelected) | None => {}
        }
    };

    let tray = move || {
        puzzle.with(|state| {
            let selected = state.selected().map(|item| item.id);
            state
                .unsorted_items()
                .map(|item| {
                    let id = item.id;
                    let class = if selected == Some(id) { "sort-item selected" } else { "sort-item" };
                    view! {
                        <button class=class on:click=move |_| {
                            puzzle.update(|puzzle| {
                                puzzle.select(id);
                            });
                        }>
                            {item.icon} " " {item.name}
                        </button>
                    }
                })
                .collect_view()
        })
    };

    let bins = move || {
        puzzle.with(|puzzle| {
            puzzle
                .bins()
                .iter()
                .map(|bin| {
                    let name = bin.name;
                    let contents = puzzle.items_in(name).map(|item| item.icon).collect::<String>();
                    view! {
                        <button class="sort-bin" style=format!("background: {}", bin.color) on:click=move |_| drop_into(name)>
                            <strong>{name}</strong>
                            <span class="bin-contents">{contents}</span>
                        </button>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <section class="game-card">
            <div class="sort-tray">{tray}</div>
            <div class="sort-bins">{bins}</div>
            <Show when=move || puzzle.with(|puzzle| puzzle.is_complete())>
                <p class="status">"All sorted! Great job!"</p>
                <button class="primary" on:click=move |_| puzzle.update(|puzzle| puzzle.play_again())>
                    "Play Again"
                </button>
            </Show>
        </section>
    }
}

#[component]
fn GamesPage() -> impl IntoView {
    view! {
        <main class="page">
            <h1 class="headline">"Games"</h1>
            <section class="card-grid">
                {GameKind::ALL
                    .into_iter()
                    .map(|game| view! { <a class="card" href=href(&game.route())>{game.title()}</a> })
                    .collect_view()}
            </section>
        </main>
    }
}

#[component]
fn MathGamePage(ctx: Ctx) -> impl IntoView {
    let (reveal_delay, next_round_delay, feedback_clear) = ctx.with_value(|ctx| {
        let math = &ctx.config().math;
        (
            Duration::from_millis(math.reveal_delay_ms),
            Duration::from_millis(math.next_round_delay_ms),
            Duration::from_millis(math.feedback_clear_ms),
        )
    });
    let game = create_rw_signal(ctx.with_value(|ctx| ctx.apple_game(&mut rng())));

    let pick = move |option: u32| match game.try_update(|game| game.pick(option)) {
        Some(PickResult::Correct { effects }) => {
            perform(effects);
            set_timeout(
                move || game.update(|game| game.reveal_result()),
                reveal_delay,
            );
            set_timeout(
                move || game.update(|game| game.next_round(&mut rng())),
                next_round_delay,
            );
        }
        Some(PickResult::Incorrect) => {
            set_timeout(
                move || game.update(|game| game.clear_feedback()),
                feedback_clear,
            );
        }
        Some(PickResult::Locked) | None => {}
    };

    let round = move || {
        game.with(|game| {
            let round = game.round();
            let left = "🍎".repeat(round.left as usize);
            let right = "🍎".repeat(round.right as usize);
            let equation = if game.showing_result() {
                format!("{} + {} = {}", round.left, round.right, round.answer())
            } else {
                format!("{} + {} = ?", round.left, round.right)
            };
            let feedback = match game.feedback() {
                Some(Feedback::Correct) => "Correct! 🎉",
                Some(Feedback::Incorrect) => "Try again!",
                None => "",
            };

            view! {
                <div class="apples">
                    <span>{left}</span>
                    <span class="plus">"+"</span>
                    <span>{right}</span>
                </div>
                <p class="prompt">{equation}</p>
                <div class="options-grid">
                    {round
                        .options
                        .iter()
                        .map(|&option| {
                            view! { <button class="option" on:click=move |_| pick(option)>{option}</button> }
                        })
                        .collect_view()}
                </div>
                <p class="status">{feedback}</p>
            }
        })
    };

    view! {
        <main class="page">
            <h1 class="headline">"Apple Math"</h1>
            <p class="value">{move || format!("Score: {}", game.with(|game| game.score()))}</p>
            <section class="game-card">{round}</section>
        </main>
    }
}

#[component]
fn GermBusterPage(ctx: Ctx) -> impl IntoView {
    let initial = ctx.with_value(|ctx| {
        ctx.germ_buster().unwrap_or_else(|error| {
            tracing::warn!(%error, "could not read high score");
            GermBuster::new(ctx.config().germ_buster.clone(), 0)
        })
    });
    let spawn_interval = initial.config().spawn_interval();
    let game = create_rw_signal(initial);

    let clock = set_interval_with_handle(
        move || {
            if let Some(Tick::Over(over)) = game.try_update(|game| game.tick()) {
                if let Some(Err(error)) = ctx.try_update_value(|ctx| ctx.record_game_over(&over)) {
                    tracing::warn!(%error, "could not save high score");
                }
                perform(over.effects);
            }
        },
        Duration::from_secs(1),
    );
    let spawner = set_interval_with_handle(
        move || {
            game.update(|game| {
                game.spawn(&mut rng());
            });
        },
        spawn_interval,
    );
    on_cleanup(move || {
        if let Ok(handle) = clock {
            handle.clear();
        }
        if let Ok(handle) = spawner {
            handle.clear();
        }
    });

    let splat = move |id: u64| {
        if let Some(Splat::Correct { effects }) = game.try_update(|game| game.splat(&mut rng(), id)) {
            perform(effects);
        }
    };

    let field = move || {
        game.with(|game| {
            game.germs()
                .iter()
                .map(|germ| {
                    let id = germ.id;
                    let style = format!(
                        "left: {:.1}%; top: {:.1}%; color: {}",
                        germ.x,
                        germ.y,
                        germ.visual.color()
                    );
                    view! {
                        <button class="germ" style=style on:click=move |_| splat(id)>
                            <span class="germ-face">{germ.visual.emoji()}</span>
                            <span class="germ-value">{germ.value}</span>
                        </button>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <main class="page">
            <h1 class="headline">"Germ Buster Math"</h1>
            <section class="status-panel">
                <div class="status-item">
                    <p class="label">"Score"</p>
                    <p class="value">{move || game.with(|game| game.score())}</p>
                </div>
                <div class="status-item">
                    <p class="label">"Time"</p>
                    <p class="value">{move || game.with(|game| game.time_left())}</p>
                </div>
                <div class="status-item">
                    <p class="label">"Best"</p>
                    <p class="value">{move || game.with(|game| game.high_score())}</p>
                </div>
            </section>
            <p class="prompt">
                {move || game.with(|game| game.problem().map(|problem| format!("{problem} = ?")))}
            </p>
            <section class="germ-field">{field}</section>
            <Show when=move || game.with(|game| game.phase() != Phase::Playing)>
                <button class="primary" on:click=move |_| game.update(|game| game.start(&mut rng()))>
                    {move || if game.with(|game| game.phase() == Phase::GameOver) { "Play Again" } else { "Start" }}
                </button>
            </Show>
        </main>
    }
}

/// Plays one run, a step at a time, until it finishes or goes stale.
fn schedule_step(dispatcher: RwSignal<Dispatcher>, ticket: RunTicket, delay: Duration) {
    set_timeout(
        move || match dispatcher.try_update(|dispatcher| dispatcher.step(ticket)) {
            Some(StepEvent::Moved { .. }) => schedule_step(dispatcher, ticket, delay),
            Some(StepEvent::Finished { effects, .. }) => perform(effects),
            Some(StepEvent::Stale) | None => {}
        },
        delay,
    );
}

#[component]
fn DispatcherPanel(ctx: Ctx) -> impl IntoView {
    let (built, step_delay) =
        ctx.with_value(|ctx| (ctx.dispatcher(), ctx.config().dispatcher.step_delay()));
    let dispatcher = match built {
        Ok(dispatcher) => create_rw_signal(dispatcher),
        Err(error) => {
            return view! {
                <section class="error-card"><p class="error-body">{error.to_string()}</p></section>
            }
            .into_view();
        }
    };

    let apply = move |input: DispatcherInput| {
        if let Some(DispatcherEvent::Started(ticket)) =
            dispatcher.try_update(|dispatcher| dispatcher.handle(input))
        {
            schedule_step(dispatcher, ticket, step_delay);
        }
    };

    let listener = window_event_listener(ev::keydown, move |event| {
        if let Some(input) = DispatcherInput::from_key(&event.key()) {
            event.prevent_default();
            apply(input);
        }
    });
    on_cleanup(move || listener.remove());

    let board = move || {
        dispatcher.with(|dispatcher| {
            let level = dispatcher.level();
            let robot = dispatcher.position();
            level
                .cells()
                .map(|cell| {
                    let (class, glyph) = if cell == robot {
                        ("cell robot", "🤖")
                    } else if cell == level.end() {
                        ("cell patient", "🤕")
                    } else if level.is_obstacle(cell) {
                        ("cell hazard", "⛔")
                    } else {
                        ("cell", "")
                    };
                    view! { <div class=class>{glyph}</div> }
                })
                .collect_view()
        })
    };
    let columns = move || {
        dispatcher.with(|dispatcher| {
            format!("grid-template-columns: repeat({}, 1fr)", dispatcher.level().size())
        })
    };
    let queue = move || {
        dispatcher.with(|dispatcher| {
            dispatcher
                .commands()
                .iter()
                .map(|command| view! { <span class="command">{command.arrow()}</span> })
                .collect_view()
        })
    };
    let status = move || {
        dispatcher.with(|dispatcher| match dispatcher.status() {
            RunStatus::NotStarted => "Program the robot to reach the patient.",
            RunStatus::Running => "Running...",
            RunStatus::Succeeded => SUCCESS_MESSAGE,
            RunStatus::Failed => FAILURE_MESSAGE,
        })
    };
    let editable = move || dispatcher.with(|dispatcher| dispatcher.accepts_commands());

    view! {
        <small class="hint">{KEYBOARD_HINT}</small>
        <section class="game-card">
            <p class="eyebrow">
                {move || dispatcher.with(|dispatcher| {
                    format!("Level {} of {}", dispatcher.level_index() + 1, dispatcher.level_count())
                })}
            </p>
            <div class="grid-board" style=columns>{board}</div>
            <div class="command-queue">{queue}</div>
            <p class="status">{status}</p>
        </section>
        <div class="direction-pad">
            {Direction::ALL
                .into_iter()
                .map(|direction| {
                    view! {
                        <button
                            class="pill"
                            aria-label=direction.token()
                            disabled=move || !editable()
                            on:click=move |_| apply(DispatcherInput::Command(direction))
                        >
                            {direction.arrow()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
        <div class="header-actions">
            <button class="pill" disabled=move || !editable() on:click=move |_| apply(DispatcherInput::Undo)>"Undo"</button>
            <button class="pill" disabled=move || !editable() on:click=move |_| apply(DispatcherInput::Clear)>"Clear"</button>
            <button class="primary" disabled=move || !editable() on:click=move |_| apply(DispatcherInput::Run)>"Run"</button>
            <button class="pill" on:click=move |_| apply(DispatcherInput::Reset)>"Reset"</button>
            <Show when=move || dispatcher.with(|dispatcher| dispatcher.status() == RunStatus::Succeeded)>
                <button class="primary" on:click=move |_| apply(DispatcherInput::NextLevel)>"Next Level"</button>
            </Show>
        </div>
    }
    .into_view()
}

#[component]
fn SensoryMathPage(ctx: Ctx) -> impl IntoView {
    let (tab, set_tab) = create_signal(LabTab::default());

    let on_transcript = Closure::<dyn FnMut(String)>::new(|transcript: String| {
        tracing::debug!(%transcript, "voice command");
        if parse_voice_command(&transcript) == Some(VoiceCommand::Capture) {
            capture_view(CAPTURE_FILE_STEM);
        }
    });
    let recognition = listen_for_speech(&on_transcript);
    on_cleanup(move || {
        stop_listening(&recognition);
        drop(on_transcript);
    });

    let tabs = LabTab::ALL
        .into_iter()
        .map(|lab| {
            view! {
                <button
                    class="tab"
                    class:active=move || tab.get() == lab
                    on:click=move |_| set_tab.set(lab)
                >
                    {lab.label()}
                </button>
            }
        })
        .collect_view();

    let panel = move || match tab.get() {
        LabTab::Dispatcher => view! { <DispatcherPanel ctx=ctx /> }.into_view(),
        LabTab::Sorting => view! { <SortingGame ctx=ctx /> }.into_view(),
    };

    view! {
        <main class="page">
            <div id=LAB_CONTAINER class="sensory-lab">
                <div class="lab-header">
                    <span class="hint">"🎙️ " {VOICE_HINT}</span>
                    <div class="lab-tabs">{tabs}</div>
                    <div class="header-actions">
                        <button class="pill" title="Toggle Fullscreen" on:click=move |_| toggle_fullscreen()>
                            "⛶"
                        </button>
                        <button
                            class="pill"
                            title="Save Certificate (Screen Capture)"
                            on:click=move |_| capture_view(CAPTURE_FILE_STEM)
                        >
                            "📸"
                        </button>
                    </div>
                </div>
                <div id=CAPTURE_TARGET>
                    <header class="lab-intro">
                        <h2>{move || tab.get().heading()}</h2>
                        <p class="lede">{move || tab.get().instructions()}</p>
                        {move || {
                            let lab = tab.get();
                            view! {
                                <SpeakButton text=lab.instructions().to_string() />
                                <button class="pill concept" on:click=move |_| speak(lab.math_concept())>
                                    "📐 Math Concept"
                                </button>
                            }
                        }}
                    </header>
                    {panel}
                </div>
            </div>
        </main>
    }
}

#[component]
fn AboutPage() -> impl IntoView {
    view! {
        <main class="page">
            <h1 class="headline">"About HealthHub"</h1>
            <p class="lede">
                "HealthHub teaches children basic first aid through short illustrated lessons, "
                "read-aloud instructions, quizzes and games. Calm and dark display modes make "
                "the app comfortable for sensory-sensitive learners."
            </p>
        </main>
    }
}

#[component]
fn NotFoundPage() -> impl IntoView {
    view! {
        <main class="page">
            <section class="placeholder-card">
                <p class="eyebrow">"Page not found"</p>
                <a href=href(&Route::Dashboard)>"Go home"</a>
            </section>
        </main>
    }
}

#[component]
fn App() -> impl IntoView {
    let ctx: Ctx = store_value(AppContext::new(PageStore::open(), GameConfig::default()));
    let (mode, set_mode) = create_signal(DisplayMode::default());
    let (route, set_route) = create_signal(current_route());
    let catalog = create_rw_signal(LessonCatalog::builtin());

    create_effect(move |_| set_body_theme(mode.get().theme()));

    let listener = window_event_listener(ev::hashchange, move |_| set_route.set(current_route()));
    on_cleanup(move || listener.remove());

    spawn_local(async move {
        match fetch_catalog().await {
            Ok(loaded) => catalog.set(loaded),
            Err(message) => tracing::debug!(%message, "using built-in lessons"),
        }
    });

    let chrome = move || route.with(|route| route.as_ref().is_none_or(Route::shows_chrome));

    let page = move || match route.get() {
        Some(Route::Login) => view! { <LoginPage /> }.into_view(),
        Some(Route::Dashboard) => view! { <DashboardPage catalog=catalog /> }.into_view(),
        Some(Route::Lessons) => view! { <LessonsPage catalog=catalog /> }.into_view(),
        Some(Route::Lesson(id)) => view! { <LessonPage catalog=catalog id=id /> }.into_view(),
        Some(Route::Quiz) => view! { <QuizPage ctx=ctx /> }.into_view(),
        Some(Route::FindHelp) => view! { <FindHelpPage /> }.into_view(),
        Some(Route::Profile) => view! { <ProfilePage ctx=ctx /> }.into_view(),
        Some(Route::Kit) => view! { <KitPage ctx=ctx /> }.into_view(),
        Some(Route::MathGame) => view! { <MathGamePage ctx=ctx /> }.into_view(),
        Some(Route::Games) => view! { <GamesPage /> }.into_view(),
        Some(Route::GermBuster) => view! { <GermBusterPage ctx=ctx /> }.into_view(),
        Some(Route::SensoryMath) => view! { <SensoryMathPage ctx=ctx /> }.into_view(),
        Some(Route::About) => view! { <AboutPage /> }.into_view(),
        None => view! { <NotFoundPage /> }.into_view(),
    };

    view! {
        <Show when=chrome>
            <Navbar mode=mode set_mode=set_mode />
        </Show>
        {page}
        <Show when=chrome>
            <Footer />
        </Show>
    }
}

pub fn mount() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    mount_to_body(|| view! { <App /> });
}
