use std::cell::RefCell;
use std::rc::Rc;

use nexus_chat::prelude::*;
use nexus_chat::render;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    console, CloseEvent, Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent,
    MessageEvent, WebSocket,
};

use crate::page::{self, ids, WebError};

type WebClient = ChatClient<DomView, BrowserTransport, StaticContext>;

impl From<WebError> for JsValue {
    fn from(e: WebError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

fn js_error_text(v: &JsValue) -> String {
    v.as_string().unwrap_or_else(|| format!("{v:?}"))
}

fn report(context: &str, err: &JsValue) {
    console::error_2(&JsValue::from_str(context), err);
}

fn local_storage_get_string(key: &str) -> Option<String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(key).ok().flatten())
}

// ── DOM view ───────────────────────────────────────────────────────────────

pub struct DomView {
    document: Document,
    input: HtmlInputElement,
    history: Element,
    details: HtmlElement,
    graph_viewer: Element,
    metrics: Element,
    feedback: Option<Element>,
}

fn element(document: &Document, id: &'static str) -> Result<Element, WebError> {
    document
        .get_element_by_id(id)
        .ok_or(WebError::MissingElement(id))
}

impl DomView {
    /// Bind every required target up front; a page missing one is rejected.
    pub fn bind(document: &Document) -> Result<Self, WebError> {
        let input = element(document, ids::MESSAGE_INPUT)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| WebError::WrongElementType(ids::MESSAGE_INPUT))?;
        let details = element(document, ids::EXECUTION_DETAILS)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| WebError::WrongElementType(ids::EXECUTION_DETAILS))?;
        Ok(Self {
            document: document.clone(),
            input,
            history: element(document, ids::CHAT_HISTORY)?,
            details,
            graph_viewer: element(document, ids::GRAPH_VIEWER)?,
            metrics: element(document, ids::METRICS_DISPLAY)?,
            feedback: document.get_element_by_id(ids::LEARNING_FEEDBACK),
        })
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    /// `<tag class=..>text</tag>`, with the text set as plain content.
    fn text_node(&self, tag: &str, class: Option<&str>, text: &str) -> Result<Element, JsValue> {
        let el = self.document.create_element(tag)?;
        if let Some(class) = class {
            el.set_class_name(class);
        }
        el.set_text_content(Some(text));
        Ok(el)
    }

    fn fill_metrics(&self, metrics: &MetricsList) -> Result<(), JsValue> {
        self.metrics.set_text_content(None);
        self.metrics
            .append_child(&self.text_node("h4", None, &metrics.title)?)?;
        let list = self.document.create_element("ul")?;
        for item in &metrics.items {
            list.append_child(&self.text_node("li", None, item)?)?;
        }
        self.metrics.append_child(&list)?;
        Ok(())
    }
}

impl ChatView for DomView {
    fn input_value(&self) -> String {
        self.input.value()
    }

    fn clear_input(&mut self) {
        self.input.set_value("");
    }

    fn append_entry(&mut self, message: &Message) {
        let entry = match self.text_node(
            "div",
            Some(&page::entry_class(message.sender.as_str())),
            &message.display_line(),
        ) {
            Ok(el) => el,
            Err(e) => return report("failed to create transcript entry", &e),
        };
        if let Err(e) = self.history.append_child(&entry) {
            return report("failed to append transcript entry", &e);
        }
        self.history.set_scroll_top(self.history.scroll_height());
    }

    fn reveal_details(&mut self) {
        if let Err(e) = self.details.style().set_property("display", "block") {
            report("failed to reveal execution details", &e);
        }
    }

    fn set_graph_placeholder(&mut self, placeholder: &str) {
        self.graph_viewer.set_text_content(None);
        let res = self
            .text_node("div", Some("ueir-graph-placeholder"), placeholder)
            .and_then(|el| self.graph_viewer.append_child(&el));
        if let Err(e) = res {
            report("failed to render graph placeholder", &e);
        }
    }

    fn set_metrics(&mut self, metrics: &MetricsList) {
        if let Err(e) = self.fill_metrics(metrics) {
            report("failed to render metrics", &e);
        }
    }

    fn show_learning_feedback(&mut self, feedback: &Value) {
        let lines = render::learning_feedback_lines(feedback);
        let Some(target) = &self.feedback else {
            for line in &lines {
                console::info_1(&JsValue::from_str(&format!("learning feedback: {line}")));
            }
            return;
        };
        target.set_text_content(None);
        for line in &lines {
            let res = self
                .text_node("div", Some("feedback-line"), line)
                .and_then(|el| target.append_child(&el));
            if let Err(e) = res {
                return report("failed to render learning feedback", &e);
            }
        }
    }

    fn show_note(&mut self, note: &str) {
        console::info_1(&JsValue::from_str(&format!("executor note: {note}")));
    }
}

// ── Transport ──────────────────────────────────────────────────────────────

pub struct BrowserTransport {
    socket: WebSocket,
}

impl BrowserTransport {
    pub fn socket(&self) -> &WebSocket {
        &self.socket
    }
}

impl Transport for BrowserTransport {
    fn send_text(&mut self, frame: &str) -> Result<(), TransportError> {
        self.socket
            .send_with_str(frame)
            .map_err(|e| TransportError::Send(js_error_text(&e)))
    }
}

pub struct BrowserConnector;

impl Connector for BrowserConnector {
    type Transport = BrowserTransport;

    fn connect(&mut self, url: &str) -> Result<BrowserTransport, TransportError> {
        let socket = WebSocket::new(url).map_err(|e| TransportError::Connect(js_error_text(&e)))?;
        Ok(BrowserTransport { socket })
    }
}

// ── Wiring ─────────────────────────────────────────────────────────────────

fn attach_socket_handlers(socket: &WebSocket, client: &Rc<RefCell<WebClient>>) {
    let c = Rc::clone(client);
    let onopen = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        c.borrow_mut().on_open();
        console::log_1(&JsValue::from_str("Connected to Nexus Executor"));
    });
    socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let c = Rc::clone(client);
    let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let Some(text) = event.data().as_string() else {
            console::warn_1(&JsValue::from_str("ignoring non-text frame"));
            return;
        };
        if let Err(e) = c.borrow_mut().on_inbound_frame(&text) {
            console::error_1(&JsValue::from_str(&e.to_string()));
        }
    });
    socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let c = Rc::clone(client);
    let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
        let reason = event.reason();
        console::warn_1(&JsValue::from_str(&format!(
            "connection closed (code {})",
            event.code()
        )));
        c.borrow_mut()
            .on_close(Some(reason.as_str()).filter(|r| !r.is_empty()));
    });
    socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();

    let c = Rc::clone(client);
    let onerror = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        c.borrow_mut().on_close(Some("socket error"));
    });
    socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();
}

fn attach_input_handler(client: &Rc<RefCell<WebClient>>) -> Result<(), JsValue> {
    let input = client.borrow().view().input().clone();
    let c = Rc::clone(client);
    let onkeypress = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if event.key() != "Enter" {
            return;
        }
        if let Err(e) = c.borrow_mut().submit() {
            console::error_1(&JsValue::from_str(&e.to_string()));
        }
    });
    input.add_event_listener_with_callback("keypress", onkeypress.as_ref().unchecked_ref())?;
    onkeypress.forget();
    Ok(())
}

/// Bind the page, open the socket and wire the event handlers.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;
    let location = window.location();
    let endpoint = Endpoint::from_page(&location.protocol()?, &location.host()?);

    let view = DomView::bind(&document)?;
    let prefs = page::parse_context_preferences(
        local_storage_get_string(page::CONTEXT_STORAGE_KEY).as_deref(),
    );
    let client = ChatClient::connect(
        &mut BrowserConnector,
        &endpoint,
        view,
        StaticContext::new(prefs),
    )
    .map_err(|e| JsValue::from(WebError::Js(e.to_string())))?;

    let socket = client.transport().socket().clone();
    let client = Rc::new(RefCell::new(client));
    attach_socket_handlers(&socket, &client);
    attach_input_handler(&client)?;
    Ok(())
}
