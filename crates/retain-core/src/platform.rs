//! Platform classes every pass can see.
//!
//! Only the slice of the Kotlin/Android class graph the classifier and the
//! collector walk through is described here.

use retain_model::names;
use retain_model::{ClassDecl, ClassKind};

fn class(name: &str, supertypes: &[&str]) -> ClassDecl {
    supertypes
        .iter()
        .fold(ClassDecl::new(name), |class, supertype| {
            class.with_supertype(*supertype)
        })
}

fn interface(name: &str, supertypes: &[&str]) -> ClassDecl {
    class(name, supertypes).with_kind(ClassKind::Interface)
}

pub fn platform_classes() -> Vec<ClassDecl> {
    let number_like = [names::KOTLIN_NUMBER, names::KOTLIN_COMPARABLE];
    vec![
        class(names::KOTLIN_ANY, &[]),
        interface(names::KOTLIN_COMPARABLE, &[names::KOTLIN_ANY]),
        interface(names::KOTLIN_CHAR_SEQUENCE, &[names::KOTLIN_ANY]),
        interface(names::KOTLIN_CLONEABLE, &[names::KOTLIN_ANY]),
        interface(names::JAVA_SERIALIZABLE, &[names::KOTLIN_ANY]),
        interface(names::JAVA_RANDOM_ACCESS, &[names::KOTLIN_ANY]),
        class(names::KOTLIN_NUMBER, &[names::KOTLIN_ANY]),
        class(names::KOTLIN_INT, &number_like),
        class(names::KOTLIN_LONG, &number_like),
        class(names::KOTLIN_SHORT, &number_like),
        class(names::KOTLIN_BYTE, &number_like),
        class(names::KOTLIN_FLOAT, &number_like),
        class(names::KOTLIN_DOUBLE, &number_like),
        class(names::KOTLIN_BOOLEAN, &[names::KOTLIN_COMPARABLE]),
        class(names::KOTLIN_CHAR, &[names::KOTLIN_COMPARABLE]),
        class(
            names::KOTLIN_STRING,
            &[names::KOTLIN_COMPARABLE, names::KOTLIN_CHAR_SEQUENCE],
        ),
        class(
            names::KOTLIN_ENUM,
            &[names::KOTLIN_COMPARABLE, names::JAVA_SERIALIZABLE],
        ),
        class(
            names::KOTLIN_ARRAY,
            &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE],
        ),
        class("kotlin.ByteArray", &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE]),
        class("kotlin.CharArray", &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE]),
        class("kotlin.ShortArray", &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE]),
        class("kotlin.IntArray", &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE]),
        class("kotlin.LongArray", &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE]),
        class("kotlin.FloatArray", &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE]),
        class("kotlin.DoubleArray", &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE]),
        class("kotlin.BooleanArray", &[names::KOTLIN_CLONEABLE, names::JAVA_SERIALIZABLE]),
        interface(names::KOTLIN_LIST, &[names::KOTLIN_ANY]),
        interface(names::KOTLIN_MUTABLE_LIST, &[names::KOTLIN_LIST]),
        class(
            names::KOTLIN_ARRAY_LIST,
            &[
                names::KOTLIN_MUTABLE_LIST,
                names::JAVA_RANDOM_ACCESS,
                names::KOTLIN_CLONEABLE,
                names::JAVA_SERIALIZABLE,
            ],
        ),
        class("java.util.Date", &[names::JAVA_SERIALIZABLE, names::KOTLIN_CLONEABLE, names::KOTLIN_COMPARABLE]),
        class("java.util.UUID", &[names::JAVA_SERIALIZABLE, names::KOTLIN_COMPARABLE]),
        class("java.math.BigDecimal", &[names::KOTLIN_NUMBER, names::KOTLIN_COMPARABLE, names::JAVA_SERIALIZABLE]),
        interface(names::ANDROID_PARCELABLE, &[names::KOTLIN_ANY]),
        interface(names::ANDROID_IBINDER, &[names::KOTLIN_ANY]),
        class(names::ANDROID_BASE_BUNDLE, &[names::KOTLIN_ANY]),
        class(
            names::ANDROID_BUNDLE,
            &[names::ANDROID_BASE_BUNDLE, names::KOTLIN_CLONEABLE, names::ANDROID_PARCELABLE],
        ),
        class(names::ANDROID_SIZE, &[names::KOTLIN_ANY]),
        class(names::ANDROID_SIZE_F, &[names::KOTLIN_ANY]),
        class(names::ANDROID_SPARSE_ARRAY, &[names::KOTLIN_CLONEABLE]),
        class("android.content.Intent", &[names::ANDROID_PARCELABLE, names::KOTLIN_CLONEABLE]),
        class("android.net.Uri", &[names::ANDROID_PARCELABLE, names::KOTLIN_COMPARABLE]),
        class("android.graphics.Bitmap", &[names::ANDROID_PARCELABLE]),
        class("android.graphics.Rect", &[names::ANDROID_PARCELABLE]),
        class("android.content.Context", &[names::KOTLIN_ANY]),
        class("android.view.ContextThemeWrapper", &["android.content.Context"]),
        class(names::ANDROID_ACTIVITY, &["android.view.ContextThemeWrapper"]),
        class(names::ANDROIDX_CORE_COMPONENT_ACTIVITY, &[names::ANDROID_ACTIVITY]),
        class(
            names::ANDROIDX_COMPONENT_ACTIVITY,
            &[names::ANDROIDX_CORE_COMPONENT_ACTIVITY],
        ),
        class(
            names::ANDROIDX_FRAGMENT_ACTIVITY,
            &[names::ANDROIDX_COMPONENT_ACTIVITY],
        ),
        class(
            names::ANDROIDX_APPCOMPAT_ACTIVITY,
            &[names::ANDROIDX_FRAGMENT_ACTIVITY],
        ),
        class(names::ANDROIDX_FRAGMENT, &[names::KOTLIN_ANY]),
        class("androidx.fragment.app.DialogFragment", &[names::ANDROIDX_FRAGMENT]),
    ]
}
