//! Runtime base sources emitted on the first pass.

use retain_model::names;
use retain_model::RuntimePlan;

use crate::writer::KotlinWriter;

fn header(w: &mut KotlinWriter, package: &str, imports: &[&str]) {
    if !package.is_empty() {
        w.line(format!("package {package}"));
        w.blank();
    }
    for import in imports {
        w.line(format!("import {import}"));
    }
    if !imports.is_empty() {
        w.blank();
    }
}

fn qualified(package: &str, simple: &str) -> String {
    if package.is_empty() {
        simple.to_string()
    } else {
        format!("{package}.{simple}")
    }
}

pub fn render_state_saver(plan: &RuntimePlan) -> String {
    let mut w = KotlinWriter::new();
    header(&mut w, &plan.package, &["android.os.Bundle"]);
    let holder = names::STATE_HOLDER;
    w.block(format!("interface {}", names::STATE_SAVER), |w| {
        w.line(format!(
            "fun saveStateConfigChange(component: Any, stateHolder: {holder}?): {holder}"
        ));
        w.line(format!(
            "fun restoreStateConfigChange(component: Any, stateHolder: {holder})"
        ));
        w.line("fun saveStateBundle(component: Any, bundle: Bundle)");
        w.line("fun restoreStateBundle(component: Any, bundle: Bundle)");
    });
    w.blank();
    w.block(
        format!("class {} : {}", names::EMPTY_STATE_SAVER, names::STATE_SAVER),
        |w| {
            w.line(format!(
                "override fun saveStateConfigChange(component: Any, stateHolder: {holder}?): {holder} = stateHolder ?: {}()",
                names::EMPTY_STATE_HOLDER
            ));
            w.line(format!(
                "override fun restoreStateConfigChange(component: Any, stateHolder: {holder}) {{}}"
            ));
            w.line("override fun saveStateBundle(component: Any, bundle: Bundle) {}");
            w.line("override fun restoreStateBundle(component: Any, bundle: Bundle) {}");
        },
    );
    w.blank();
    w.block(format!("fun provideStateSaver(): {}", names::STATE_SAVER), |w| {
        w.open("return try");
        w.line(format!(
            "Class.forName(\"{}\")",
            qualified(&plan.package, names::GENERATED_STATE_SAVER)
        ));
        w.line(format!(
            "    .getDeclaredConstructor().newInstance() as {}",
            names::STATE_SAVER
        ));
        w.reopen("} catch (ex: ClassNotFoundException) {");
        w.line(format!("{}()", names::EMPTY_STATE_SAVER));
        w.close();
    });
    w.finish()
}

pub fn render_state_holder(plan: &RuntimePlan) -> String {
    let mut w = KotlinWriter::new();
    header(&mut w, &plan.package, &[]);
    w.line(format!("interface {}", names::STATE_HOLDER));
    w.blank();
    w.line(format!(
        "class {} : {}",
        names::EMPTY_STATE_HOLDER,
        names::STATE_HOLDER
    ));
    w.finish()
}

pub fn render_identification_strategy(plan: &RuntimePlan) -> String {
    let mut w = KotlinWriter::new();
    header(&mut w, &plan.package, &[]);
    w.block(format!("enum class {}", names::IDENTIFICATION_STRATEGY), |w| {
        w.line("TAG,");
        w.line("ID,");
        w.line("CLASS,");
    });
    w.finish()
}

pub fn render_state_saving_activity(plan: &RuntimePlan) -> String {
    let mut w = KotlinWriter::new();
    header(
        &mut w,
        &plan.package,
        &[
            "android.os.Bundle",
            "androidx.annotation.CallSuper",
            &plan.activity_superclass,
            "androidx.fragment.app.FragmentOnAttachListener",
            "androidx.lifecycle.DefaultLifecycleObserver",
            "androidx.lifecycle.LifecycleOwner",
        ],
    );
    let superclass = retain_model::symbols::simple_name(&plan.activity_superclass);
    let holder = names::STATE_HOLDER;
    w.block(
        format!("open class {} : {superclass}()", names::STATE_SAVING_ACTIVITY),
        |w| {
            w.line(format!("val stateSaver: {} = provideStateSaver()", names::STATE_SAVER));
            w.line(format!("private var retainedStateHolder: {holder}? = null"));
            w.blank();
            w.block("private val lifecycleObserver = object : DefaultLifecycleObserver", |w| {
                w.block("override fun onCreate(owner: LifecycleOwner)", |w| {
                    w.line("@Suppress(\"DEPRECATION\")");
                    w.block(
                        format!("(lastCustomNonConfigurationInstance as? {holder})?.let"),
                        |w| w.line("stateSaver.restoreStateConfigChange(owner, it)"),
                    );
                });
                w.blank();
                w.block("override fun onDestroy(owner: LifecycleOwner)", |w| {
                    w.block("if (isChangingConfigurations)", |w| {
                        w.line(
                            "retainedStateHolder = stateSaver.saveStateConfigChange(owner, retainedStateHolder)",
                        );
                    });
                });
            });
            w.blank();
            w.line("private val attachListener = FragmentOnAttachListener { _, fragment ->");
            w.line("    fragment.lifecycle.addObserver(lifecycleObserver)");
            w.line("}");
            w.blank();
            w.line("@CallSuper");
            w.block("override fun onCreate(savedInstanceState: Bundle?)", |w| {
                w.line("supportFragmentManager.addFragmentOnAttachListener(attachListener)");
                w.line("super.onCreate(savedInstanceState)");
                w.line("@Suppress(\"DEPRECATION\")");
                w.block(
                    format!("(lastCustomNonConfigurationInstance as? {holder})?.let"),
                    |w| w.line("stateSaver.restoreStateConfigChange(this, it)"),
                );
                w.block("if (savedInstanceState != null)", |w| {
                    w.line("stateSaver.restoreStateBundle(this, savedInstanceState)");
                });
            });
            w.blank();
            w.line("@CallSuper");
            w.block("override fun onSaveInstanceState(outState: Bundle)", |w| {
                w.line("stateSaver.saveStateBundle(this, outState)");
                w.line("super.onSaveInstanceState(outState)");
            });
            w.blank();
            w.line("@CallSuper");
            w.line("@Suppress(\"OVERRIDE_DEPRECATION\")");
            w.block("override fun onRetainCustomNonConfigurationInstance(): Any?", |w| {
                w.line("val holder = stateSaver.saveStateConfigChange(this, retainedStateHolder)");
                w.line("retainedStateHolder = holder");
                w.line("return holder");
            });
        },
    );
    w.finish()
}

pub fn render_state_saving_fragment(plan: &RuntimePlan) -> String {
    let mut w = KotlinWriter::new();
    header(
        &mut w,
        &plan.package,
        &[
            "android.os.Bundle",
            "androidx.annotation.CallSuper",
            &plan.fragment_superclass,
        ],
    );
    let superclass = retain_model::symbols::simple_name(&plan.fragment_superclass);
    let strategy = names::IDENTIFICATION_STRATEGY;
    w.block(
        format!("open class {} : {superclass}()", names::STATE_SAVING_FRAGMENT),
        |w| {
            w.line(format!("val stateSaver: {} = provideStateSaver()", names::STATE_SAVER));
            w.blank();
            w.line(format!(
                "open var identificationStrategy: {strategy} = {strategy}.TAG"
            ));
            w.blank();
            w.line("@CallSuper");
            w.block("override fun onCreate(savedInstanceState: Bundle?)", |w| {
                w.line("super.onCreate(savedInstanceState)");
                w.block("if (savedInstanceState != null)", |w| {
                    w.line("stateSaver.restoreStateBundle(this, savedInstanceState)");
                });
            });
            w.blank();
            w.line("@CallSuper");
            w.block("override fun onSaveInstanceState(outState: Bundle)", |w| {
                w.line("stateSaver.saveStateBundle(this, outState)");
                w.line("super.onSaveInstanceState(outState)");
            });
        },
    );
    w.finish()
}
