//! Fixed TypeScript embedded in the generated modules.
//!
//! `matchRoute`, `findRouteForPath`, `hydrateRoute` and `RouteContext` follow
//! the same rules as [`crate::matcher`] and [`crate::navigation`].

pub const DEFAULT_FALLBACK: &str = "<div>Loading...</div>";

pub const TYPES_TAIL: &str = r##"
export interface RouteMatch {
    /** Navigation path as it was given. */
    path: string
    /** Canonical name of the matched route. */
    route: RoutePath
    params: Record<string, string>
    /** 0 means a perfect match. */
    distance: number
}

/**
 * Runs before a route and its descendants are shown.
 * Return the canonical path of another route to redirect there,
 * or nothing to let the navigation through.
 */
export type AccessGuard = (
    match: RouteMatch,
    hash: string
) => RoutePath | undefined | Promise<RoutePath | undefined>
"##;

pub const ROUTES_HEAD: &str = r##"
import React from "react"

import { AccessGuard, RoutePath, RouteMatch } from "./types"
"##;

pub const ROUTES_TAIL: &str = r##"
/**
 * Using this function prevents dangling routes from being
 * discovered at runtime. If you try to reach a route that
 * does not exist anymore, you will get a compilation error.
 * @param route Canonical name of the target route.
 * @param params If the canonical name has `[name]` parts,
 * they will be hydrated by the `params`.
 * For instance, `goto("/article/[id]/detail", 27)` will lead
 * to `"/article/27/detail"`.
 * @returns `false` if we already are on this page (with the same params).
 */
export function goto(route: RoutePath, ...params: (string | number)[]): boolean {
    const path = hydrateRoute(route, params)
    if (path === currentRouteContext.value?.path) return false

    window.location.hash = path
    return true
}

/**
 * Syntactic sugar for `() => { goto(...) }`.
 */
export function makeGoto(route: RoutePath, ...params: (string | number)[]) {
    return () => {
        goto(route, ...params)
    }
}

export function isRouteEqualTo(route: RoutePath, ...params: (string | number)[]): boolean {
    return currentRouteContext.value?.path === hydrateRoute(route, params)
}

export function getRouteParam(name: string): string | undefined {
    return currentRouteContext.value?.params[name]
}

export function findRouteForPath(path: string): RouteMatch | null {
    let bestMatch: RouteMatch | null = null
    for (const segments of Object.values<string[]>(ROUTES)) {
        const match = matchRoute(path, segments)
        if (!match) continue

        if (match.distance === 0) return match

        if (!bestMatch || match.distance < bestMatch.distance) {
            bestMatch = match
        }
    }
    return bestMatch
}

export function matchRoute(path: string, segments: string[]): RouteMatch | null {
    let current = trimLeadingSlashes(path)
    const params: Record<string, string> = {}
    for (const segment of segments) {
        if (current.length < 1) return null

        const name = paramName(segment)
        if (name !== null) {
            const [head, tail] = decapitate(current)
            params[name] = head
            current = tail
        } else {
            const rest = stripLiteral(current, segment)
            if (rest === null) return null

            current = rest
        }
    }
    return {
        path,
        route: `/${segments.join("/")}` as RoutePath,
        params,
        distance: current.length,
    }
}

function paramName(segment: string): string | null {
    const start = segment.indexOf("[")
    if (start < 0) return null

    const end = segment.lastIndexOf("]")
    return segment.substring(start + 1, end > start ? end : segment.length)
}

function stripLiteral(text: string, literal: string): string | null {
    if (!text.startsWith(literal)) return null

    const rest = text.substring(literal.length)
    if (rest.length === 0) return rest

    return rest.startsWith("/") ? rest.substring(1) : null
}

function trimLeadingSlashes(text: string): string {
    let start = 0
    while (text.charAt(start) === "/") start++
    return text.substring(start)
}

function decapitate(text: string): [string, string] {
    const pos = text.indexOf("/")
    if (pos < 0) return [text, ""]

    return [text.substring(0, pos), text.substring(pos + 1)]
}

function hydrateRoute(route: RoutePath, params: (string | number)[]): string {
    let index = 0
    const items = ROUTES[route].map(item =>
        paramName(item) === null ? item : `${params[index++] ?? ""}`
    )
    return `/${items.join("/")}`
}

function guardCovers(prefix: string, route: string): boolean {
    const base = prefix.replace(/\/+$/, "")
    return base.length === 0 || route === base || route.startsWith(`${base}/`)
}

class RouteContext {
    private readonly listeners = new Set<(value: RouteMatch | null) => void>()
    private _value: RouteMatch | null = null
    private generation = 0

    constructor(private readonly guards: Array<[string, AccessGuard]>) {
        const hash = this.extractHash(window.location.href)
        const absHash = this.ensureAbsoluteHash(hash, "/")
        if (absHash !== hash) {
            history.replaceState({}, "", `#${absHash}`)
        }
        void this.resolve(absHash)
        window.addEventListener("hashchange", this.handleHashChange)
    }

    addListener(listener: (value: RouteMatch | null) => void) {
        this.listeners.add(listener)
    }

    removeListener(listener: (value: RouteMatch | null) => void) {
        this.listeners.delete(listener)
    }

    get value() {
        return this._value
    }

    dispose() {
        this.generation++
        this.listeners.clear()
        window.removeEventListener("hashchange", this.handleHashChange)
    }

    private async resolve(hash: string) {
        const generation = ++this.generation
        let value = findRouteForPath(hash)
        let redirect: RoutePath | undefined = undefined
        if (value) {
            const guard = this.findGuard(value.route)
            if (guard) redirect = await guard(value, hash)
        }
        // A newer hash change started while the guard was running.
        if (generation !== this.generation) return

        if (value && redirect && redirect !== value.route) {
            value = findRouteForPath(redirect)
            window.location.hash = redirect
        }
        if (value?.route === this._value?.route) return

        this._value = value
        this.listeners.forEach(listener => listener(value))
    }

    private findGuard(route: string): AccessGuard | undefined {
        const entry = this.guards.find(([prefix]) => guardCovers(prefix, route))
        return entry?.[1]
    }

    private readonly handleHashChange = (event: HashChangeEvent) => {
        const oldHash = this.extractHash(event.oldURL)
        const newHash = this.extractHash(event.newURL)
        const absHash = this.ensureAbsoluteHash(newHash, oldHash)
        if (absHash !== newHash) {
            history.replaceState({}, "", `#${absHash}`)
        }
        void this.resolve(absHash)
    }

    private extractHash(url: string): string {
        const hash = new URL(url).hash
        if (!hash || hash === "#") return "/"

        return hash.startsWith("#") ? hash.substring(1) : hash
    }

    private ensureAbsoluteHash(newHash: string, oldHash: string): string {
        if (newHash.startsWith("/")) return newHash

        let hash = newHash
        while (hash.startsWith("./")) {
            hash = hash.substring("./".length)
        }
        const path = oldHash.split("/").filter(item => item.trim().length > 0)
        for (const item of hash.split("/")) {
            if (item === "" || item === ".") continue

            if (item === "..") path.pop()
            else path.push(item)
        }
        return `/${path.join("/")}`
    }
}

export function useRouteContext(): RouteMatch | null {
    const [value, setValue] = React.useState(currentRouteContext.value)
    React.useEffect(() => {
        const update = (next: RouteMatch | null) => {
            setValue(next)
        }
        currentRouteContext.addListener(update)
        return () => currentRouteContext.removeListener(update)
    }, [])
    return value
}

export function useRouteParam(name: string): string | undefined {
    return useRouteContext()?.params[name]
}
"##;

pub const INDEX_HEAD: &str = r##"
export * from "./routes"
export * from "./types"

import React from "react"

import { matchRoute, useRouteContext, ROUTES } from "./routes"
import { RouteMatch, RoutePath } from "./types"
"##;

pub const INDEX_TAIL: &str = r##"
function intl<T>(base: T, translations: Record<string, T>, lang = ""): T {
    const exact = translations[lang]
    if (exact) return exact

    const [prefix] = lang.split("-")
    const fallback = translations[prefix]
    if (fallback) return fallback

    return base
}

type PageComponent = React.FC<{ params: Record<string, string> }>
type ContainerComponent = React.FC<{
    children: React.ReactNode
    params: Record<string, string>
}>

interface RouteProps {
    path: RoutePath
    context: RouteMatch | null
    fallback: JSX.Element
    children?: React.ReactNode
    Page?: PageComponent
    Layout?: ContainerComponent
    Template?: ContainerComponent
}

function Route({ path, context, fallback, children, Page, Layout, Template }: RouteProps) {
    const m = context && matchRoute(context.path, ROUTES[path])
    if (!m) return null

    if (m.distance === 0) {
        if (!Page) return null

        const element = Template ? (
            <Template params={m.params}>
                <Page params={m.params} />
            </Template>
        ) : (
            <Page params={m.params} />
        )
        const page = <React.Suspense fallback={fallback}>{element}</React.Suspense>
        return Layout ? <Layout params={m.params}>{page}</Layout> : page
    }
    return Layout ? <Layout params={m.params}>{children}</Layout> : <>{children}</>
}
"##;
